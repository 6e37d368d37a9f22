use bcal_engine::{
    chs_to_lba, lba_to_chs, Chs, ChsParams, GeometryError, GeometryRequest, LbaParams,
};

#[test]
fn test_chs_to_lba_basic() {
    assert_eq!(chs_to_lba(0, 0, 1, 16, 63).unwrap(), 0);
    assert_eq!(chs_to_lba(0, 1, 1, 16, 63).unwrap(), 63);
    assert_eq!(chs_to_lba(1, 0, 1, 16, 63).unwrap(), 1008);
    assert_eq!(chs_to_lba(2, 3, 4, 255, 63).unwrap(), 2 * 255 * 63 + 3 * 63 + 3);
}

#[test]
fn test_lba_to_chs_basic() {
    assert_eq!(lba_to_chs(63, 16, 63).unwrap(), Chs::new(0, 1, 1));
    assert_eq!(lba_to_chs(0, 16, 63).unwrap(), Chs::new(0, 0, 1));
    assert_eq!(lba_to_chs(1008, 16, 63).unwrap(), Chs::new(1, 0, 1));
    assert_eq!(lba_to_chs(1007, 16, 63).unwrap(), Chs::new(0, 15, 63));
}

#[test]
fn test_chs_bounds_are_checked() {
    assert_eq!(chs_to_lba(0, 0, 1, 0, 63), Err(GeometryError::ZeroMaxHead));
    assert_eq!(chs_to_lba(0, 0, 1, 16, 0), Err(GeometryError::ZeroMaxSector));
    assert_eq!(chs_to_lba(0, 0, 0, 16, 63), Err(GeometryError::ZeroSector));
    assert_eq!(chs_to_lba(0, 17, 1, 16, 63), Err(GeometryError::HeadOutOfRange));
    assert_eq!(chs_to_lba(0, 0, 64, 16, 63), Err(GeometryError::SectorOutOfRange));
    assert_eq!(
        chs_to_lba(u128::MAX, 0, 1, 16, 63),
        Err(GeometryError::Overflow)
    );
}

#[test]
fn test_lba_bounds_are_checked() {
    assert_eq!(lba_to_chs(10, 0, 63), Err(GeometryError::ZeroMaxHead));
    assert_eq!(lba_to_chs(10, 16, 0), Err(GeometryError::ZeroMaxSector));
}

#[test]
fn test_chs_params_use_defaults() {
    let params = ChsParams::parse("0-1-1").unwrap();
    assert_eq!(params.chs, Chs::new(0, 1, 1));
    assert_eq!(params.max_head, 16);
    assert_eq!(params.max_sector, 63);
    assert_eq!(params.to_lba().unwrap(), 63);

    let params = ChsParams::parse("1-2-3-255").unwrap();
    assert_eq!(params.max_head, 255);
    assert_eq!(params.max_sector, 63);

    let params = ChsParams::parse("0x1-0-1-0x10-0x3f").unwrap();
    assert_eq!(params.to_lba().unwrap(), 1008);
}

#[test]
fn test_chs_params_errors() {
    assert_eq!(ChsParams::parse("1-2"), Err(GeometryError::MissingChs));
    assert_eq!(ChsParams::parse(""), Err(GeometryError::MissingChs));
    assert_eq!(
        ChsParams::parse("1-x-3"),
        Err(GeometryError::InvalidComponent("x".into()))
    );
    assert_eq!(
        ChsParams::parse("1-2-3-4-5-6"),
        Err(GeometryError::InvalidComponent("6".into()))
    );
}

#[test]
fn test_lba_params_use_defaults() {
    let params = LbaParams::parse("1007").unwrap();
    assert_eq!(params.to_chs().unwrap(), Chs::new(0, 15, 63));

    let params = LbaParams::parse("5000-255").unwrap();
    assert_eq!(params.max_head, 255);
    assert_eq!(params.max_sector, 63);

    assert_eq!(LbaParams::parse(""), Err(GeometryError::MissingLba));
}

#[test]
fn test_request_dispatch() {
    assert!(matches!(
        GeometryRequest::parse("c0-1-1").unwrap(),
        GeometryRequest::ChsToLba(_)
    ));
    assert!(matches!(
        GeometryRequest::parse("L63").unwrap(),
        GeometryRequest::LbaToChs(_)
    ));
    assert_eq!(GeometryRequest::parse("x1-2-3"), Err(GeometryError::InvalidInput));
    assert_eq!(GeometryRequest::parse("c"), Err(GeometryError::MissingChs));
    assert_eq!(GeometryRequest::parse("l"), Err(GeometryError::MissingLba));
}
