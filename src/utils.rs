/// `network![2, 3, 1]` builds a randomly initialized network,
/// `network![2, 3, 1; seed 7]` a reproducible one.
#[macro_export]
macro_rules! network {
    ($($size:expr),+ ; seed $seed:expr) => {
        $crate::models::NetworkConfig::new(&[$($size),+]).with_seed($seed).build()
    };
    ($($size:expr),+ $(,)?) => {
        $crate::models::Network::new(&[$($size),+])
    };
}
