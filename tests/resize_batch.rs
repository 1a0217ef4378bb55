use std::fs;
use std::path::{Path, PathBuf};

use image::{GenericImageView, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

use zaytools::{Error, ResampleFilter, ResizeParams, resize_images, resize_images_with_params};

struct Fixture {
    _root: TempDir,
    input: PathBuf,
    output: PathBuf,
}

fn fixture() -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("assets").join("unresized");
    fs::create_dir_all(&input).unwrap();
    let output = root.path().join("assets").join("resized");
    Fixture {
        _root: root,
        input,
        output,
    }
}

fn write_rgb(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([10, 120, 250]))
        .save(path)
        .unwrap();
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn stretches_pngs_into_sibling_folder() {
    let fx = fixture();
    write_rgb(&fx.input.join("a.png"), 800, 600);
    fs::write(fx.input.join("notes.txt"), "not an image").unwrap();

    let report = resize_images(&fx.input, 1440, 900).unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(listing(&fx.output), vec!["a.png"]);
    assert!(!fx.input.join("resized").exists());

    let out = image::open(fx.output.join("a.png")).unwrap();
    assert_eq!(out.dimensions(), (1440, 900));

    // source untouched
    let src = image::open(fx.input.join("a.png")).unwrap();
    assert_eq!(src.dimensions(), (800, 600));
}

#[test]
fn matches_png_suffix_case_insensitively_and_ignores_the_rest() {
    let fx = fixture();
    write_rgb(&fx.input.join("lower.png"), 20, 10);
    write_rgb(&fx.input.join("UPPER.PNG"), 10, 20);
    write_rgb(&fx.input.join("Mixed.Png"), 5, 5);
    fs::write(fx.input.join("readme.md"), "# art").unwrap();
    fs::write(fx.input.join("archive.png.zip"), [0u8; 8]).unwrap();
    fs::create_dir(fx.input.join("nested.png")).unwrap();
    write_rgb(&fx.input.join("nested.png").join("deep.png"), 4, 4);

    let report = resize_images(&fx.input, 32, 16).unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.skipped, 3);
    assert_eq!(
        listing(&fx.output),
        vec!["Mixed.Png", "UPPER.PNG", "lower.png"]
    );
    for name in ["Mixed.Png", "UPPER.PNG", "lower.png"] {
        let out = image::open(fx.output.join(name)).unwrap();
        assert_eq!(out.dimensions(), (32, 16), "{name}");
    }
}

#[test]
fn corrupt_files_do_not_stop_the_batch() {
    let fx = fixture();
    write_rgb(&fx.input.join("a.png"), 30, 30);
    fs::write(fx.input.join("broken.png"), b"\x89PNG but not really").unwrap();
    write_rgb(&fx.input.join("c.png"), 30, 30);

    let report = resize_images(&fx.input, 12, 8).unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.errors, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "broken.png");
    assert_eq!(listing(&fx.output), vec!["a.png", "c.png"]);
}

#[test]
fn existing_output_is_overwritten_and_strangers_left_alone() {
    let fx = fixture();
    fs::create_dir_all(&fx.output).unwrap();
    write_rgb(&fx.output.join("a.png"), 3, 3);
    fs::write(fx.output.join("keep.txt"), "stale").unwrap();
    write_rgb(&fx.input.join("a.png"), 40, 40);

    let report = resize_images(&fx.input, 25, 10).unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(listing(&fx.output), vec!["a.png", "keep.txt"]);
    assert_eq!(
        image::open(fx.output.join("a.png")).unwrap().dimensions(),
        (25, 10)
    );
    assert_eq!(fs::read_to_string(fx.output.join("keep.txt")).unwrap(), "stale");
}

#[test]
fn colour_layout_is_preserved() {
    let fx = fixture();
    GrayImage::from_pixel(9, 9, Luma([77]))
        .save(fx.input.join("grey.png"))
        .unwrap();
    RgbaImage::from_pixel(9, 9, Rgba([1, 2, 3, 0]))
        .save(fx.input.join("clear.png"))
        .unwrap();

    let params = ResizeParams {
        input_dir: fx.input.clone(),
        width: 4,
        height: 6,
        filter: ResampleFilter::Bilinear,
    };
    resize_images_with_params(&params).unwrap();

    let grey = image::open(fx.output.join("grey.png")).unwrap();
    assert_eq!(grey.color(), image::ColorType::L8);
    let clear = image::open(fx.output.join("clear.png")).unwrap();
    assert_eq!(clear.color(), image::ColorType::Rgba8);
    assert_eq!(clear.get_pixel(2, 3)[3], 0);
}

#[test]
fn empty_folder_still_creates_output() {
    let fx = fixture();

    let report = resize_images(&fx.input, 10, 10).unwrap();

    assert_eq!(report.processed, 0);
    assert!(fx.output.is_dir());
    assert!(report.resized.is_empty());
}

#[test]
fn missing_input_folder_is_an_io_error() {
    let fx = fixture();
    let missing = fx.input.join("nope");

    assert!(matches!(
        resize_images(&missing, 10, 10),
        Err(Error::Io(_))
    ));
}

#[test]
fn zero_dimensions_are_rejected_before_touching_disk() {
    let fx = fixture();

    assert!(matches!(
        resize_images(&fx.input, 0, 10),
        Err(Error::ZeroSize { arg: "width" })
    ));
    assert!(matches!(
        resize_images(&fx.input, 10, 0),
        Err(Error::ZeroSize { arg: "height" })
    ));
    assert!(!fx.output.exists());
}

#[test]
fn input_folder_named_resized_is_refused() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("resized");
    fs::create_dir(&input).unwrap();
    write_rgb(&input.join("a.png"), 80, 60);

    let err = resize_images(&input, 10, 10).unwrap_err();

    assert!(matches!(err, Error::Processing(_)));
    let src = image::open(input.join("a.png")).unwrap();
    assert_eq!(src.dimensions(), (80, 60));
    assert_eq!(listing(&input), vec!["a.png"]);
}

#[cfg(target_os = "linux")]
#[test]
fn write_failures_land_in_the_report() {
    let fx = fixture();
    write_rgb(&fx.input.join("a.png"), 8, 8);
    write_rgb(&fx.input.join("b.png"), 8, 8);
    fs::create_dir_all(&fx.output).unwrap();
    std::os::unix::fs::symlink("/dev/full", fx.output.join("a.png")).unwrap();

    let report = resize_images(&fx.input, 4, 4).unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "a.png");
    assert_eq!(image::open(fx.output.join("b.png")).unwrap().dimensions(), (4, 4));
}
