//! End-to-end region extraction scenarios.

use image::{Rgb, Rgba, RgbaImage};
use sheetsplit::{extract_regions, BackgroundModel, Bounds, RegionOptions, SpriteSink};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLUE: Rgba<u8> = Rgba([20, 40, 180, 255]);

fn fill_rect(image: &mut RgbaImage, x1: u32, y1: u32, x2: u32, y2: u32, color: Rgba<u8>) {
    for y in y1..y2 {
        for x in x1..x2 {
            image.put_pixel(x, y, color);
        }
    }
}

fn white_model() -> BackgroundModel {
    BackgroundModel::new(Rgb([255.0, 255.0, 255.0]), None, 30.0)
}

fn options() -> RegionOptions {
    RegionOptions {
        min_size: 20,
        padding: 2,
        erosion: 0,
    }
}

/// Three disjoint blobs: 30x30, 15x15 (below min size), 50x25, all in one
/// 50px row band.
fn three_blob_sheet() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(200, 100, WHITE);
    fill_rect(&mut image, 10, 10, 40, 40, BLUE);
    fill_rect(&mut image, 60, 30, 75, 45, BLUE);
    fill_rect(&mut image, 100, 20, 150, 45, BLUE);
    image
}

#[test]
fn small_blob_is_filtered_and_order_is_left_to_right() {
    let image = three_blob_sheet();
    let dir = tempfile::tempdir().unwrap();
    let sink = SpriteSink::new(dir.path(), "sheet".to_owned()).unwrap();

    let records = extract_regions(&image, &white_model(), &options(), &sink).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].source,
        Bounds {
            x1: 10,
            y1: 10,
            x2: 40,
            y2: 40
        }
    );
    assert_eq!(
        records[1].source,
        Bounds {
            x1: 100,
            y1: 20,
            x2: 150,
            y2: 45
        }
    );
    // Sizes reflect the padded crop.
    assert_eq!((records[0].width, records[0].height), (34, 34));
    assert_eq!((records[1].width, records[1].height), (54, 29));
    assert!(records.iter().all(|record| record.grid_pos.is_none()));
}

#[test]
fn renamed_files_match_final_record_order() {
    let image = three_blob_sheet();
    let dir = tempfile::tempdir().unwrap();
    let sink = SpriteSink::new(dir.path(), "sheet".to_owned()).unwrap();

    let records = extract_regions(&image, &white_model(), &options(), &sink).unwrap();

    for (position, record) in records.iter().enumerate() {
        assert_eq!(record.index, position);
        assert_eq!(record.file, format!("sheet_{position:03}.png"));
        assert!(dir.path().join(&record.file).exists());
    }
    // No temporary names survive the rename.
    assert!(!dir.path().join("_tmp_000.png").exists());
    assert!(!dir.path().join("sheet_002.png").exists());
}

#[test]
fn sort_uses_row_bands_then_x() {
    // A blob high in the second band and one low in the first band: band
    // order wins over raw y.
    let mut image = RgbaImage::from_pixel(200, 160, WHITE);
    fill_rect(&mut image, 150, 60, 180, 95, BLUE); // band 1 (y1 = 60)
    fill_rect(&mut image, 10, 100, 40, 130, BLUE); // band 2 (y1 = 100)
    fill_rect(&mut image, 100, 70, 130, 95, BLUE); // band 1, right of nothing

    let dir = tempfile::tempdir().unwrap();
    let sink = SpriteSink::new(dir.path(), "sheet".to_owned()).unwrap();
    let records = extract_regions(&image, &white_model(), &options(), &sink).unwrap();

    let order: Vec<u32> = records.iter().map(|record| record.source.x1).collect();
    assert_eq!(order, vec![100, 150, 10]);
}

#[test]
fn erosion_splits_bridged_sprites() {
    // Two 30x30 blocks joined by a 1px line; an opening of 2 separates them.
    let mut image = RgbaImage::from_pixel(120, 60, WHITE);
    fill_rect(&mut image, 10, 15, 40, 45, BLUE);
    fill_rect(&mut image, 70, 15, 100, 45, BLUE);
    fill_rect(&mut image, 40, 30, 70, 31, BLUE);

    let dir = tempfile::tempdir().unwrap();
    let sink = SpriteSink::new(dir.path(), "sheet".to_owned()).unwrap();

    let merged = extract_regions(&image, &white_model(), &options(), &sink).unwrap();
    assert_eq!(merged.len(), 1);

    let dir2 = tempfile::tempdir().unwrap();
    let sink2 = SpriteSink::new(dir2.path(), "sheet".to_owned()).unwrap();
    let opts = RegionOptions {
        min_size: 20,
        padding: 2,
        erosion: 2,
    };
    let split = extract_regions(&image, &white_model(), &opts, &sink2).unwrap();
    assert_eq!(split.len(), 2);
    assert_eq!(
        split[0].source,
        Bounds {
            x1: 10,
            y1: 15,
            x2: 40,
            y2: 45
        }
    );
}

#[test]
fn uniform_image_extracts_nothing() {
    let image = RgbaImage::from_pixel(200, 100, WHITE);
    let dir = tempfile::tempdir().unwrap();
    let sink = SpriteSink::new(dir.path(), "sheet".to_owned()).unwrap();

    let records = extract_regions(&image, &white_model(), &options(), &sink).unwrap();
    assert!(records.is_empty());
}

#[test]
fn crops_are_matted_to_transparency() {
    let image = three_blob_sheet();
    let dir = tempfile::tempdir().unwrap();
    let sink = SpriteSink::new(dir.path(), "sheet".to_owned()).unwrap();

    let records = extract_regions(&image, &white_model(), &options(), &sink).unwrap();
    let crop = image::open(dir.path().join(&records[0].file))
        .unwrap()
        .to_rgba8();

    assert_eq!(crop.dimensions(), (34, 34));
    // Padding ring is background and therefore transparent; the blob
    // interior is opaque.
    assert_eq!(crop.get_pixel(0, 0)[3], 0);
    assert_eq!(crop.get_pixel(17, 17)[3], 255);
}
