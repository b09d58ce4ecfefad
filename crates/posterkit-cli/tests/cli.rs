use std::path::Path;

use assert_cmd::Command;
use image::{GrayImage, Luma, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

/// `posterkit` with config and data directories isolated in `home`.
fn posterkit(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("posterkit").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("HOME", home);
    cmd
}

fn write_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([30, 60, 90])).save(path).unwrap();
}

#[test]
fn poster_missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.pdf");

    posterkit(dir.path())
        .args(["poster", "missing.jpg", "-w", "42", "-t", "29.7", "-o"])
        .arg(&output)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("input file not found"));

    assert!(!output.exists());
}

#[test]
fn poster_splits_across_two_sheets() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    write_image(&input, 84, 60);

    posterkit(dir.path())
        .arg("poster")
        .arg(&input)
        .args(["-w", "42", "-t", "29.7", "--dpi", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages needed: 2 x 1 = 2"));

    let doc = lopdf::Document::load(dir.path().join("photo_poster.pdf")).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn poster_rejects_non_positive_size() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    write_image(&input, 10, 10);

    posterkit(dir.path())
        .arg("poster")
        .arg(&input)
        .args(["-w", "0", "-t", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid dimensions"));

    assert!(!dir.path().join("photo_poster.pdf").exists());
}

#[test]
fn pdf_uses_size_in_default_name() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    write_image(&input, 40, 20);

    posterkit(dir.path())
        .arg("pdf")
        .arg(&input)
        .args(["-s", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Size in PDF: 10.00 x 5.00 cm"));

    let doc = lopdf::Document::load(dir.path().join("photo_10cm.pdf")).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn mask_applies_alpha() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    let mask = dir.path().join("mask.png");
    write_image(&input, 4, 4);
    GrayImage::from_pixel(4, 4, Luma([77])).save(&mask).unwrap();

    posterkit(dir.path())
        .arg("mask")
        .arg(&input)
        .arg(&mask)
        .assert()
        .success();

    let out = image::open(dir.path().join("photo_masked.png")).unwrap().to_rgba8();
    assert!(out.pixels().all(|p| p[3] == 77));
}

#[test]
fn mask_size_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    let mask = dir.path().join("mask.png");
    write_image(&input, 4, 4);
    GrayImage::new(3, 4).save(&mask).unwrap();

    posterkit(dir.path())
        .arg("mask")
        .arg(&input)
        .arg(&mask)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sizes do not match"));

    assert!(!dir.path().join("photo_masked.png").exists());
}

#[test]
fn remove_bg_without_model_suggests_download() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    write_image(&input, 4, 4);

    posterkit(dir.path())
        .arg("remove-bg")
        .arg(&input)
        .args(["-m", "u2netp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("models download -m u2netp"));
}

#[test]
fn remove_bg_missing_input_reported_before_model() {
    let dir = TempDir::new().unwrap();

    posterkit(dir.path())
        .args(["remove-bg", "missing.jpg", "-m", "u2netp"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("input file not found"))
        .stderr(predicate::str::contains("models download").not());

    assert!(!dir.path().join("missing_no_bg.png").exists());
}

#[test]
fn config_file_supplies_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("posterkit.json");

    posterkit(dir.path())
        .args(["config", "init", "-o"])
        .arg(&config)
        .assert()
        .success();

    posterkit(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "print.target_size_cm", "8"])
        .assert()
        .success();

    posterkit(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "print.target_size_cm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8.0"));

    let input = dir.path().join("photo.png");
    write_image(&input, 20, 40);
    posterkit(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("pdf")
        .arg(&input)
        .assert()
        .success();

    assert!(dir.path().join("photo_8cm.pdf").exists());
}
