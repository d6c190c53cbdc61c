use ffnet::prelude::*;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let net = Network::builder()
        .input(4)
        .dense(16)
        .dense(8)
        .dense(3)
        .seed(42)
        .build()?;

    println!("{}", net.summary());

    // two samples, one per column
    let x = array![[0.5, -1.0], [1.5, 0.25], [-0.3, 2.0], [0.0, 0.7]];
    let y = array![[1.0, 0.0], [0.0, 0.0], [0.0, 1.0]];

    let (prediction, cache) = net.forward(x)?;
    println!("prediction:\n{}", prediction);

    // softmax + cross-entropy: the output-layer error is prediction - target
    let grads = net.backward(&cache, &prediction - &y)?;
    for layer in 1..net.num_layers() {
        info!(
            "layer {}: |dW| = {:.6}, |db| = {:.6}",
            layer,
            grads.weights[layer].mapv(|g| g * g).sum().sqrt(),
            grads.biases[layer].mapv(|g| g * g).sum().sqrt()
        );
    }
    println!("gradient norm: {:.6}", grads.norm());

    let path = std::env::temp_dir().join("ffnet_demo.model");
    net.save_with_cache(&path, &cache)?;
    let (loaded, _) = Network::load_with_cache(&path)?;
    println!("reloaded network with sizes {:?}", loaded.sizes());

    Ok(())
}
