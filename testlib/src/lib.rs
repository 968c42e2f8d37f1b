use approx::assert_abs_diff_eq;
use ndarray::azip;
use std::io::Write;

/// compare two time axes point by point
pub fn assert_times_eq(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len(), "times differ: {:?} != {:?}", a, b);

    for (a, b) in a.iter().zip(b) {
        assert_abs_diff_eq!(a, b, epsilon = 1.0e-9);
    }
}

pub fn assert_arr1_eq<Sa, Sb>(
    a: &ndarray::ArrayBase<Sa, ndarray::Ix1>,
    b: &ndarray::ArrayBase<Sb, ndarray::Ix1>,
    epsilon: f64,
) where
    Sa: ndarray::Data<Elem = f64>,
    Sb: ndarray::Data<Elem = f64>,
{
    assert_eq!(a.dim(), b.dim());

    azip!((a in a, b in b) assert_abs_diff_eq!(a, b, epsilon = epsilon));
}

/// compare two trajectories row by row, i.e. grid point by grid point
pub fn assert_arr2_eq<Sa, Sb>(
    a: &ndarray::ArrayBase<Sa, ndarray::Ix2>,
    b: &ndarray::ArrayBase<Sb, ndarray::Ix2>,
    epsilon: f64,
) where
    Sa: ndarray::Data<Elem = f64>,
    Sb: ndarray::Data<Elem = f64>,
{
    assert_eq!(a.dim(), b.dim());

    for (a, b) in a.outer_iter().zip(b.outer_iter()) {
        assert_arr1_eq(&a, &b, epsilon);
    }
}

/// temporary trajectory file, removed when the handle is dropped
pub fn trajectory_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .expect("can't create trajectory file");
    file.write_all(contents.as_bytes())
        .expect("can't write trajectory file");
    file
}
