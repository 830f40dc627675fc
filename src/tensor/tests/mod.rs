use crate::errors::TensorError;
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_new_scalar_and_matrix() {
    let tensor = Tensor::new(&[1.], &[]);
    assert_eq!(tensor.shape(), &[] as &[usize]);
    assert_eq!(tensor.size(), 1);

    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(tensor.shape(), &[2, 3]);
    assert_eq!(tensor.to_vec(), vec![1., 2., 3., 4., 5., 6.]);
}

#[test]
#[should_panic]
fn test_new_invalid_shape() {
    let _ = Tensor::new(&[1., 2.], &[1, 1, 1]);
}

#[test]
fn test_from_vec_reports_mismatch() {
    let err = Tensor::from_vec(vec![1., 2., 3.], &[2, 2]).unwrap_err();
    assert_eq!(
        err,
        TensorError::DataShapeMismatch {
            data_len: 3,
            shape: vec![2, 2],
            expected: 4,
        }
    );
}

#[test]
fn test_filled_and_zeros() {
    let ones = Tensor::filled(1.5, &[1, 5]);
    assert!(ones.iter().all(|x| x == 1.5));
    let zeros = Tensor::zeros(&[3, 3, 2]);
    assert_eq!(zeros.size(), 18);
    assert!(zeros.iter().all(|x| x == 0.));
}

#[test]
fn test_normal_seeded_is_reproducible() {
    let a = Tensor::normal_seeded(0.0, 1.0, &[4, 7], 42);
    let b = Tensor::normal_seeded(0.0, 1.0, &[4, 7], 42);
    let c = Tensor::normal_seeded(0.0, 1.0, &[4, 7], 43);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.shape(), &[4, 7]);
}

#[test]
fn test_abs_diff_eq() {
    let a = Tensor::new(&[0.1, 0.2], &[2]);
    let b = Tensor::new(&[0.1 + 1e-7, 0.2], &[2]);
    assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    // 形状不同即不相等
    let c = Tensor::new(&[0.1, 0.2], &[1, 2]);
    assert!(!approx::abs_diff_eq!(a, c, epsilon = 1e-6));
}
