// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::f64::consts::FRAC_PI_2;

use super::*;

use approx::assert_abs_diff_eq;

use crate::header::{CasaImageAdapter, FormatAdapter};

#[test]
fn test_geodetic_to_geocentric_equator() {
    let pos = geodetic_to_geocentric(0.0, 0.0, 0.0);
    assert_abs_diff_eq!(pos.x, WGS84_A, epsilon = 1e-9);
    assert_abs_diff_eq!(pos.y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(pos.z, 0.0, epsilon = 1e-9);
}

#[test]
fn test_geodetic_to_geocentric_pole() {
    let pos = geodetic_to_geocentric(FRAC_PI_2, 0.0, 0.0);
    assert_abs_diff_eq!(pos.x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(pos.y, 0.0, epsilon = 1e-6);
    assert!(pos.z > 0.0);
    // The polar radius.
    assert_abs_diff_eq!(pos.z, 6356752.314245163, epsilon = 1e-6);
}

#[test]
fn test_geodetic_to_geocentric_mwa() {
    let pos = GeodeticPosition {
        latitude_rad: (-26.70331940_f64).to_radians(),
        longitude_rad: 116.67081524_f64.to_radians(),
        height_m: 377.83,
    }
    .to_geocentric();
    assert_abs_diff_eq!(pos.x, -2559454.080476053, epsilon = 1e-6);
    assert_abs_diff_eq!(pos.y, 5095372.146151413, epsilon = 1e-6);
    assert_abs_diff_eq!(pos.z, -2849057.186144502, epsilon = 1e-6);
}

#[test]
fn test_geodetic_position_from_document() {
    let doc = CasaImageAdapter.parse(
        "FILETYPE\tCASA Image\n\
         TELESCOP_LAT\t-0.4660608447416767\n\
         TELESCOP_LON\t2.036289866923978\n\
         TELESCOP_HGT\t377.83\n",
    );
    let result = GeodeticPosition::from_document(&doc, "TELESCOP_LAT", "TELESCOP_LON", "TELESCOP_HGT");
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let pos = result.unwrap();
    assert_abs_diff_eq!(pos.latitude_rad, -0.4660608447416767);
    assert_abs_diff_eq!(pos.height_m, 377.83);

    let doc = CasaImageAdapter.parse("FILETYPE\tCASA Image\nTELESCOP_LAT\t-0.46\n");
    assert_eq!(
        GeodeticPosition::from_document(&doc, "TELESCOP_LAT", "TELESCOP_LON", "TELESCOP_HGT"),
        Err(CoordError::MissingGeodeticInput("TELESCOP_LON".to_string()))
    );
}

#[test]
fn test_decimalize_dms() {
    for (input, expected) in [
        ("+0.0.1.0", 1.0 / 3600.0),
        ("-0.0.1.0", -1.0 / 3600.0),
        ("-0.0.1.0,", -1.0 / 3600.0),
        ("+0.1.0.0", 1.0 / 60.0),
        ("+44.55.19.95", 44.0 + 55.0 / 60.0 + 19.95 / 3600.0),
        ("-12.30.0", -12.5),
    ] {
        let result = decimalize_dms(input);
        assert!(result.is_ok(), "{input}: {:?}", result.unwrap_err());
        assert_abs_diff_eq!(result.unwrap(), expected, epsilon = 1e-9);
    }
}

#[test]
fn test_decimalize_dms_negative_degrees_use_sign() {
    // The sign character decides the sign, not the degrees field.
    assert_abs_diff_eq!(
        decimalize_dms("-1.30.0.0").unwrap(),
        -1.5,
        epsilon = 1e-9
    );
}

#[test]
fn test_decimalize_dms_malformed() {
    for input in ["0.0.1.0", "", "+1.2", "+1.2.3.4.5", "+a.0.1.0", "+0.0.x.0"] {
        assert_eq!(
            decimalize_dms(input),
            Err(CoordError::MalformedAngle {
                input: input.to_string()
            }),
            "'{input}' should be malformed"
        );
    }
}

#[test]
fn test_format_ra() {
    assert_eq!(format_ra_to_dms("04:45:31.695").unwrap(), "+04.45.31.695");
    assert_eq!(format_ra_to_dms(" 23:59:59.9 ").unwrap(), "+23.59.59.9");
    assert_eq!(format_ra_to_dms("+04:45:31.695").unwrap(), "+04.45.31.695");
    for ra in ["04.45.31.695", "-04:45:31.695"] {
        assert!(
            matches!(format_ra_to_dms(ra), Err(CoordError::MalformedRightAscension(_))),
            "{ra}"
        );
    }

    let result = ra_hms_to_degrees("04:45:31.695");
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_abs_diff_eq!(result.unwrap(), 71.3820625, epsilon = 1e-9);
}

#[test]
fn test_cd_matrix_without_rotation() {
    let cd = compute_cd_matrix(-1.5e-5, 1.5e-5, 0.0);
    assert_abs_diff_eq!(cd.cd11, -1.5e-5);
    assert_abs_diff_eq!(cd.cd12, 0.0);
    assert_abs_diff_eq!(cd.cd21, 0.0);
    assert_abs_diff_eq!(cd.cd22, 1.5e-5);
}

#[test]
fn test_cd_matrix_with_rotation() {
    let cd = compute_cd_matrix(-2.0, 3.0, 90.0);
    assert_abs_diff_eq!(cd.cd11, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cd.cd12, -3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cd.cd21, -2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cd.cd22, 0.0, epsilon = 1e-12);

    let keywords: Vec<String> = cd.to_records().into_iter().map(|r| r.keyword).collect();
    assert_eq!(keywords, ["CD1_1", "CD1_2", "CD2_1", "CD2_2"]);
}

#[test]
fn test_pick_rotation() {
    assert_abs_diff_eq!(pick_rotation(None, None), 0.0);
    assert_abs_diff_eq!(pick_rotation(Some(10.0), None), 10.0);
    assert_abs_diff_eq!(pick_rotation(Some(10.0), Some(20.0)), 20.0);
    assert_abs_diff_eq!(pick_rotation(None, Some(-5.0)), -5.0);
}

#[test]
fn test_map_coordinate_names() {
    let tables = LookupTables::default();

    let result = map_coordinate_name_to_fits("Frequency", 1, None, &tables);
    assert_eq!(result, Ok(vec![("CTYPE1".to_string(), "FREQ".to_string())]));
    let result = map_coordinate_name_to_fits(" Stokes ", 2, Some("SIN"), &tables);
    assert_eq!(result, Ok(vec![("CTYPE2".to_string(), "STOKES".to_string())]));

    let result = map_coordinate_name_to_fits("Declination & Right Ascension", 3, Some("SIN"), &tables);
    assert_eq!(
        result,
        Ok(vec![
            ("CTYPE3".to_string(), "DEC--SIN".to_string()),
            ("CTYPE4".to_string(), "RA---SIN".to_string())
        ])
    );

    let result = map_coordinate_name_to_fits("Latitude & Longitude", 1, Some("CAR"), &tables);
    assert_eq!(
        result,
        Ok(vec![
            ("CTYPE1".to_string(), "GLAT-CAR".to_string()),
            ("CTYPE2".to_string(), "GLON-CAR".to_string())
        ])
    );
}

#[test]
fn test_map_coordinate_name_errors() {
    let tables = LookupTables::default();
    assert_eq!(
        map_coordinate_name_to_fits("KAAAAAHN!", 1, None, &tables),
        Err(CoordError::UnrecognizedCoordinate("KAAAAAHN!".to_string()))
    );
    assert_eq!(
        map_coordinate_name_to_fits("Declination & Right Ascension", 3, Some("XYZ"), &tables),
        Err(CoordError::UnrecognizedProjection("XYZ".to_string()))
    );
    assert_eq!(
        map_coordinate_name_to_fits("Declination & Hour Angle", 3, Some("SIN"), &tables),
        Err(CoordError::UnrecognizedCoordinate(
            "Declination & Hour Angle".to_string()
        ))
    );
}
