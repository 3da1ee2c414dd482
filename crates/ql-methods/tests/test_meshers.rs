//! Mesh construction and spacing consistency.

use approx::assert_abs_diff_eq;
use ql_core::Error;
use ql_methods::{Fdm1dMesher, FdmMesher};

#[test]
fn glued_meshes_share_the_joint() {
    let left = Fdm1dMesher::uniform(0.0, 1.0, 10).unwrap();
    let right = Fdm1dMesher::uniform(1.0, 3.0, 10).unwrap();
    let glued = Fdm1dMesher::glued(&left, &right).unwrap();

    assert_eq!(glued.size(), 19);
    assert_eq!(glued.locations()[9], 1.0);
    assert_eq!(glued.locations()[18], 3.0);
    // the spacing changes at the joint
    assert!(glued.dplus(9).unwrap() > glued.dminus(9).unwrap());
}

#[test]
fn disjoint_meshes_are_concatenated() {
    let left = Fdm1dMesher::uniform(0.0, 1.0, 10).unwrap();
    let right = Fdm1dMesher::uniform(1.5, 3.0, 10).unwrap();
    assert_eq!(Fdm1dMesher::glued(&left, &right).unwrap().size(), 20);
    assert!(Fdm1dMesher::glued(&right, &left).unwrap_err().is_configuration());
}

#[test]
fn spacings_agree_across_neighbours() {
    let m = Fdm1dMesher::concentrating(-2.0, 3.0, 41, Some((0.5, 0.1)), true).unwrap();
    for i in 1..m.size() {
        assert_eq!(m.dminus(i).unwrap(), m.dplus(i - 1).unwrap());
    }
    assert!(matches!(m.dminus(0), Err(Error::Range(_))));
    assert!(matches!(m.dplus(40), Err(Error::Range(_))));
    assert!(matches!(m.dplus(41), Err(Error::IndexOutOfRange { index: 41, size: 41 })));
}

#[test]
fn product_mesh_walks_each_direction() {
    let x = Fdm1dMesher::uniform(0.0, 1.0, 3).unwrap();
    let y = Fdm1dMesher::uniform(10.0, 12.0, 4).unwrap();
    let mesher = FdmMesher::new(vec![x.into(), y.into()]).unwrap();

    assert_eq!(mesher.size(), 12);
    assert_eq!(mesher.dimensions(), 2);
    // index = i + 3·j
    assert_eq!(mesher.location(7, 0).unwrap(), 0.5);
    assert_abs_diff_eq!(mesher.location(7, 1).unwrap(), 34.0 / 3.0, epsilon = 1e-12);
    assert_eq!(mesher.dplus(7, 1).unwrap(), mesher.dminus(10, 1).unwrap());
}
