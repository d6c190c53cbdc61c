#![allow(dead_code)]

use ffnet::prelude::*;

/// Cross-entropy of softmax outputs against one-hot targets, summed over the batch.
pub fn cross_entropy(y_hat: &Array2<f64>, y: &Array2<f64>) -> f64 {
    -(y * &y_hat.mapv(f64::ln)).sum()
}

pub fn one_hot(classes: &[usize], num_classes: usize) -> Array2<f64> {
    let mut out = Array2::zeros((num_classes, classes.len()));
    for (sample, &class) in classes.iter().enumerate() {
        out[[class, sample]] = 1.0;
    }
    out
}
