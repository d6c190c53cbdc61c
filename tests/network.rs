mod common;

use common::one_hot;
use ffnet::prelude::*;
use std::f64::consts::E;

fn identity_network() -> Network {
    let mut net = Network::new(&[2, 2, 2]).unwrap();
    for layer in 1..3 {
        net.set_parameters(layer, Array2::eye(2), Array2::zeros((2, 1))).unwrap();
    }
    net
}

#[test]
fn fixed_identity_weights_produce_known_output() {
    let net = identity_network();
    let (out, cache) = net.forward(array![[1.0], [0.0]]).unwrap();

    assert_eq!(cache.activation(1).unwrap(), &array![[1.0], [0.0]]);
    assert_eq!(cache.linear_transform(2).unwrap(), &array![[1.0], [0.0]]);
    assert!((out[[0, 0]] - E / (E + 1.0)).abs() < 1e-12);
    assert!((out[[1, 0]] - 1.0 / (E + 1.0)).abs() < 1e-12);
    assert!((out[[0, 0]] - 0.731).abs() < 1e-3);
}

#[test]
fn output_is_a_distribution_per_sample() {
    let net = NetworkConfig::new(&[3, 8, 8, 5]).with_seed(1).build().unwrap();
    let x = array![[1.0, -4.0, 0.0, 10.0], [0.5, 2.0, 0.0, -10.0], [-3.0, 0.1, 0.0, 25.0]];
    let (out, _) = net.forward(x).unwrap();
    assert_eq!(out.dim(), (5, 4));
    for column in out.axis_iter(Axis(1)) {
        assert!((column.sum() - 1.0).abs() < 1e-12);
        assert!(column.iter().all(|&p| p >= 0.0));
    }
}

#[test]
fn repeated_forward_passes_are_bit_identical() {
    let net = Network::new(&[4, 6, 3]).unwrap();
    let x = array![[0.3], [-1.2], [0.8], [2.0]];
    let (_, first) = net.forward(x.clone()).unwrap();
    let (_, second) = net.forward(x).unwrap();
    assert_eq!(first, second);
}

#[test]
fn gradients_are_index_aligned_with_parameters() {
    let sizes = [3, 7, 4, 2];
    let net = Network::new(&sizes).unwrap();
    let x = array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]];
    let (out, cache) = net.forward(x).unwrap();
    let grads = net.backward(&cache, &out - &one_hot(&[0, 1], 2)).unwrap();

    assert_eq!(grads.num_layers(), sizes.len());
    assert!(grads.weights[0].iter().all(|&g| g == 0.0));
    assert!(grads.biases[0].iter().all(|&g| g == 0.0));
    for layer in 1..sizes.len() {
        assert_eq!(grads.weight(layer).unwrap().dim(), net.weights(layer).unwrap().dim());
        assert_eq!(grads.bias(layer).unwrap().dim(), net.biases(layer).unwrap().dim());
    }
}

#[test]
fn backward_leaves_cache_untouched() {
    let net = Network::new(&[2, 3, 2]).unwrap();
    let (out, cache) = net.forward(array![[1.0], [2.0]]).unwrap();
    let before = cache.clone();
    net.backward(&cache, &out - &one_hot(&[1], 2)).unwrap();
    assert_eq!(cache, before);
}

#[test]
fn two_layer_network_runs_both_passes() {
    let net = Network::new(&[3, 2]).unwrap();
    let x = array![[1.0], [0.0], [-1.0]];
    let (out, cache) = net.forward(x.clone()).unwrap();
    let d = &out - &one_hot(&[0], 2);
    let grads = net.backward(&cache, d.clone()).unwrap();
    assert_eq!(grads.biases[1], d);
    assert_eq!(grads.weights[1], d.dot(&x.t()));
}

#[test]
fn independent_passes_do_not_interfere() {
    let net = NetworkConfig::new(&[2, 4, 2]).with_seed(3).build().unwrap();
    let (out_a, cache_a) = net.forward(array![[1.0], [0.0]]).unwrap();
    let (_, _cache_b) = net.forward(array![[-5.0], [9.0]]).unwrap();
    let grads_a = net.backward(&cache_a, &out_a - &one_hot(&[1], 2)).unwrap();

    let (out_fresh, cache_fresh) = net.forward(array![[1.0], [0.0]]).unwrap();
    let grads_fresh = net.backward(&cache_fresh, &out_fresh - &one_hot(&[1], 2)).unwrap();
    assert_eq!(grads_a, grads_fresh);
}

#[test]
fn batch_gradients_sum_single_sample_gradients() {
    let net = NetworkConfig::new(&[2, 3, 2]).with_seed(12).build().unwrap();
    let x = array![[0.4, -0.9], [1.1, 0.2]];
    let y = one_hot(&[0, 1], 2);

    let (out, cache) = net.forward(x.clone()).unwrap();
    let batch = net.backward(&cache, &out - &y).unwrap();

    let mut summed = None::<Gradients>;
    for col in 0..2 {
        let xi = x.column(col).to_owned().insert_axis(Axis(1));
        let yi = y.column(col).to_owned().insert_axis(Axis(1));
        let (out, cache) = net.forward(xi).unwrap();
        let g = net.backward(&cache, &out - &yi).unwrap();
        summed = Some(match summed {
            None => g,
            Some(mut acc) => {
                for layer in 0..acc.num_layers() {
                    acc.weights[layer] += &g.weights[layer];
                    acc.biases[layer] += &g.biases[layer];
                }
                acc
            }
        });
    }
    let summed = summed.unwrap();
    for layer in 1..net.num_layers() {
        let dw = (&batch.weights[layer] - &summed.weights[layer]).mapv(f64::abs).sum();
        let db = (&batch.biases[layer] - &summed.biases[layer]).mapv(f64::abs).sum();
        assert!(dw < 1e-12 && db < 1e-12);
    }
}
