use std::path::Path;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use cosmic_text::fontdb;
use tiny_skia::{Color, Pixmap};

use digiclock_types::{
    EffectConfig, GlyphSourceConfig, LineAlignment, Orientation, SkinConfig, TokenTransform,
};

use super::{ClassicSkin, ClockSkin};
use crate::effects::Effect;
use crate::factory::RenderableFactory;
use crate::geometry::{Point, Rect};
use crate::text::TextEngine;

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 7)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn write_png(dir: &Path, stem: &str, width: u32, height: u32) {
    let mut pixmap = Pixmap::new(width, height).unwrap();
    pixmap.fill(Color::WHITE);
    pixmap.save_png(dir.join(format!("{stem}.png"))).unwrap();
}

/// Digits 20x40, separator 8x40, letters p/m/a 15x40, bullet 6x40
fn glyph_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for d in 0..10 {
        write_png(dir.path(), &d.to_string(), 20, 40);
    }
    write_png(dir.path(), "sep", 8, 40);
    for letter in ["a", "p", "m"] {
        write_png(dir.path(), letter, 15, 40);
    }
    write_png(dir.path(), "u2022", 6, 40);
    dir
}

fn raster(dir: &Path) -> GlyphSourceConfig {
    GlyphSourceConfig::Raster {
        path: dir.display().to_string(),
        device_pixel_ratio: 1.0,
    }
}

fn engine() -> TextEngine {
    TextEngine::with_database(fontdb::Database::new())
}

fn skin(dir: &Path, format: &str) -> ClassicSkin {
    let mut skin = ClassicSkin::new(RenderableFactory::new(raster(dir), engine()));
    skin.set_format(format).unwrap();
    skin
}

fn kinds(scene: &super::ClockRenderable) -> Vec<&'static str> {
    scene.children().iter().map(|(r, _)| r.kind()).collect()
}

fn widths(scene: &super::ClockRenderable) -> Vec<f32> {
    scene.children().iter().map(|(r, _)| r.rect().width).collect()
}

#[test]
fn test_seconds_scene_width_is_sum_of_advances() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "hh:mm:ss");

    let scene = skin.process(&at(9, 5, 3));
    let children = scene.children();
    assert_eq!(children.len(), 5);
    assert_eq!(widths(&scene), vec![40.0, 8.0, 40.0, 8.0, 40.0]);

    let advance_sum: f32 = children.iter().map(|(r, _)| r.advance().x).sum();
    assert_eq!(scene.rect().width, advance_sum);
    assert_eq!(scene.rect(), Rect::new(0.0, 0.0, 136.0, 40.0));

    let offsets: Vec<f32> = children.iter().map(|(_, p)| p.x).collect();
    assert_eq!(offsets, vec![0.0, 40.0, 48.0, 88.0, 96.0]);
}

#[test]
fn test_twelve_hour_with_space_and_pm() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "hh:mm A");

    let scene = skin.process(&at(13, 0, 0));
    assert_eq!(
        kinds(&scene),
        vec!["composite", "raster", "composite", "empty", "composite"]
    );
    // "PM" composed from p.png and m.png
    assert_eq!(scene.children()[4].0.rect().width, 30.0);

    let advance_sum: f32 = scene.children().iter().map(|(r, _)| r.advance().x).sum();
    assert_eq!(scene.rect().width, advance_sum);
}

#[test]
fn test_blink_sequence_hides_separator_in_place() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm");
    assert!(skin.supports_separator_animation());

    let mut visibility = vec![skin.separator_visible()];
    for _ in 0..3 {
        skin.animate_separator();
        visibility.push(skin.separator_visible());
    }
    assert_eq!(visibility, [true, false, true, false]);

    let hidden = skin.process(&at(10, 30, 0));
    skin.animate_separator();
    let shown = skin.process(&at(10, 30, 0));

    assert_eq!(kinds(&hidden)[1], "empty");
    assert_eq!(kinds(&shown)[1], "raster");
    assert_eq!(hidden.children()[1].0.rect(), shown.children()[1].0.rect());
    assert_eq!(hidden.children()[1].0.advance(), shown.children()[1].0.advance());
    assert_eq!(hidden.rect(), shown.rect());
}

#[test]
fn test_disabled_animation_keeps_separator_visible() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm");

    skin.animate_separator();
    assert!(!skin.separator_visible());

    skin.set_separator_animation_enabled(false);
    assert!(skin.separator_visible());
    skin.animate_separator();
    skin.animate_separator();
    skin.animate_separator();
    assert!(skin.separator_visible());
    assert_eq!(kinds(&skin.process(&at(1, 2, 3)))[1], "raster");

    skin.set_separator_animation_enabled(true);
    assert!(skin.separator_visible());
    skin.animate_separator();
    assert!(!skin.separator_visible());
}

#[test]
fn test_no_separators_in_format() {
    let dir = glyph_dir();
    let skin = skin(dir.path(), "HH mm");
    assert!(!skin.supports_separator_animation());
}

#[test]
fn test_custom_separators_by_position() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "hh:mm:ss");
    skin.set_custom_separators("•");

    let scene = skin.process(&at(9, 5, 3));
    assert_eq!(widths(&scene), vec![40.0, 6.0, 40.0, 8.0, 40.0]);

    skin.set_custom_separators("");
    let scene = skin.process(&at(9, 5, 3));
    assert_eq!(widths(&scene)[1], 8.0);
}

#[test]
fn test_token_transform_applies_to_directive() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm:ss");
    skin.set_token_transform("ss", Some(TokenTransform::from_scale(0.5, 0.5)))
        .unwrap();

    let scene = skin.process(&at(9, 5, 3));
    assert_eq!(kinds(&scene)[4], "transformed");
    assert_eq!(widths(&scene), vec![40.0, 8.0, 40.0, 8.0, 20.0]);
    assert_eq!(scene.rect().height, 40.0);

    assert!(skin
        .set_token_transform("ss", Some(TokenTransform::from_scale(-1.0, 1.0)))
        .is_err());
    skin.set_token_transform("ss", None).unwrap();
    assert_eq!(widths(&skin.process(&at(9, 5, 3)))[4], 40.0);
}

#[test]
fn test_process_is_idempotent_and_cached() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm");

    let first = skin.process(&at(7, 45, 0));
    let second = skin.process(&at(7, 45, 0));
    assert_eq!(first.rect(), second.rect());
    for ((a, pa), (b, pb)) in first.children().iter().zip(second.children().iter()) {
        assert!(Rc::ptr_eq(a, b));
        assert_eq!(pa, pb);
    }
    assert_eq!(skin.factory().cache_len(), 3);
}

#[test]
fn test_glyph_source_change_rebuilds() {
    let a = glyph_dir();
    let b = tempfile::tempdir().unwrap();
    for d in 0..10 {
        write_png(b.path(), &d.to_string(), 10, 20);
    }
    write_png(b.path(), "sep", 4, 20);

    let mut skin = skin(a.path(), "HH:mm");
    let before = skin.process(&at(7, 45, 0));
    skin.set_glyph_source(raster(b.path())).unwrap();
    let after = skin.process(&at(7, 45, 0));

    assert!(!Rc::ptr_eq(&before.children()[0].0, &after.children()[0].0));
    assert_eq!(after.rect(), Rect::new(0.0, 0.0, 44.0, 20.0));
}

#[test]
fn test_multiline_layout_config_order() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm\\ndd");
    skin.set_line_alignment(LineAlignment::Center);

    let scene = skin.process(&at(9, 5, 0));
    assert_eq!(scene.lines().len(), 2);
    // time line (88 wide) on top, date line (40 wide) centered below
    assert_eq!(scene.lines()[0].1, Point::new(0.0, 0.0));
    assert_eq!(scene.lines()[1].1, Point::new(24.0, 40.0));
    assert_eq!(scene.rect(), Rect::new(0.0, 0.0, 88.0, 80.0));

    skin.set_layout_config("10").unwrap();
    let scene = skin.process(&at(9, 5, 0));
    assert_eq!(scene.lines()[0].1, Point::new(24.0, 0.0));
    assert_eq!(scene.lines()[1].1, Point::new(0.0, 40.0));

    skin.set_line_alignment(LineAlignment::Start);
    let scene = skin.process(&at(9, 5, 0));
    assert_eq!(scene.lines()[0].1, Point::ZERO);

    assert!(skin.set_layout_config("1x").is_err());
}

#[test]
fn test_vertical_orientation_and_spacing() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm");
    skin.set_orientation(Orientation::Vertical);
    skin.set_spacing(-5.0).unwrap();

    let scene = skin.process(&at(9, 5, 0));
    let offsets: Vec<Point> = scene.children().iter().map(|(_, p)| *p).collect();
    assert_eq!(
        offsets,
        vec![Point::ZERO, Point::new(0.0, 35.0), Point::new(0.0, 70.0)]
    );
    assert!(skin.set_spacing(f32::NAN).is_err());
}

#[test]
fn test_item_and_layout_effects() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH");
    skin.add_item_effect(Effect::opacity(0.5));

    let scene = skin.process(&at(9, 0, 0));
    assert_eq!(kinds(&scene), vec!["effected"]);
    let pixmap = scene.to_pixmap(1.0).unwrap();
    assert_eq!(pixmap.pixel(10, 20).unwrap().alpha(), 128);

    skin.add_layout_effect(Effect::opacity(0.5));
    let scene = skin.process(&at(9, 0, 0));
    assert_eq!(scene.root().kind(), "effected");
    let pixmap = scene.to_pixmap(1.0).unwrap();
    assert_eq!(pixmap.pixel(10, 20).unwrap().alpha(), 64);

    skin.clear_item_effects();
    skin.clear_layout_effects();
    let scene = skin.process(&at(9, 0, 0));
    assert_eq!(scene.root().kind(), "composite");
    assert_eq!(scene.to_pixmap(1.0).unwrap().pixel(10, 20).unwrap().alpha(), 255);
}

#[test]
fn test_missing_glyph_does_not_abort() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm 'z'");

    let scene = skin.process(&at(9, 5, 0));
    assert_eq!(kinds(&scene).last(), Some(&"missing"));
    assert!(scene.to_pixmap(1.0).is_some());
}

#[test]
fn test_missing_glyph_scene_is_stable_across_ticks() {
    let dir = glyph_dir();
    std::fs::remove_file(dir.path().join("9.png")).unwrap();
    let mut skin = skin(dir.path(), "H:mm");
    skin.set_separator_animation_enabled(false);

    let first = skin.process(&at(9, 5, 0));
    let second = skin.process(&at(9, 5, 0));
    assert_eq!(kinds(&first)[0], "missing");
    assert_eq!(first.rect(), second.rect());
    for ((a, pa), (b, pb)) in first.children().iter().zip(second.children().iter()) {
        assert!(Rc::ptr_eq(a, b));
        assert_eq!(pa, pb);
    }
}

#[test]
fn test_layout_shadow_reaches_pixmap() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH");
    skin.add_layout_effect(Effect::shadow(4.0, 4.0, Color::from_rgba8(0, 0, 255, 255)));

    let scene = skin.process(&at(9, 0, 0));
    assert_eq!(scene.rect(), Rect::new(0.0, 0.0, 40.0, 40.0));
    assert_eq!(scene.paint_rect(), Rect::new(-4.0, -4.0, 48.0, 48.0));

    let pixmap = scene.to_pixmap(1.0).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (48, 48));
    // glyph at (4..44), shadow shifted by 4 beyond it
    let glyph = pixmap.pixel(20, 20).unwrap();
    assert_eq!((glyph.red(), glyph.alpha()), (255, 255));
    let shadow = pixmap.pixel(46, 46).unwrap();
    assert_eq!((shadow.red(), shadow.blue(), shadow.alpha()), (0, 255, 255));
}

#[test]
fn test_invalid_format_keeps_previous() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH:mm");
    assert!(skin.set_format("HH 'open").is_err());
    assert!(skin.set_format("").is_err());
    assert_eq!(skin.format(), "HH:mm");
}

#[test]
fn test_from_config() {
    let dir = glyph_dir();
    let config = SkinConfig {
        time_format: "HH:mm:ss".to_string(),
        seconds_scale_factor: 50,
        custom_separators: "•".to_string(),
        spacing: 2.0,
        layout_config: "bad".to_string(),
        separator_animation: false,
        layout_effects: vec![EffectConfig::Opacity { value: 0.9 }],
        glyphs: raster(dir.path()),
        ..Default::default()
    };
    let mut skin = ClassicSkin::from_config(&config, engine());

    assert_eq!(skin.token_transform("ss"), Some(TokenTransform::from_scale(0.5, 0.5)));
    assert!(skin.separator_visible());
    skin.animate_separator();
    assert!(skin.separator_visible());

    let scene = skin.process(&at(9, 5, 3));
    assert_eq!(scene.root().kind(), "effected");
    assert_eq!(widths(&scene), vec![40.0, 6.0, 40.0, 8.0, 20.0]);
    // four gaps of 2 between five items
    assert_eq!(scene.rect().width, 40.0 + 6.0 + 40.0 + 8.0 + 20.0 + 8.0);
}

#[test]
fn test_draw_at_origin_and_scale() {
    let dir = glyph_dir();
    let mut skin = skin(dir.path(), "HH");
    let scene = skin.process(&at(9, 0, 0));

    let mut target = Pixmap::new(100, 100).unwrap();
    scene.draw(&mut target.as_mut(), (10.0, 10.0), 2.0);
    assert_eq!(target.pixel(5, 5).unwrap().alpha(), 0);
    assert_eq!(target.pixel(20, 20).unwrap().alpha(), 255);
    assert_eq!(target.pixel(80, 80).unwrap().alpha(), 255);
    assert_eq!(target.pixel(95, 95).unwrap().alpha(), 0);
}
