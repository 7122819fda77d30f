use std::path::Path;
use std::time::Duration;

use chrono::NaiveDateTime;
use tiny_skia::Pixmap;

use digiclock_skin::format_options::TimeFormatOptions;
use digiclock_skin::layout::parse_layout_config;
use digiclock_skin::utils::color_from_rgba;
use digiclock_skin::{ClockRenderable, ClockSkin, DateTimeFormatter, TokenKind};
use digiclock_types::{AppConfig, Color};

use crate::app_state::AppState;

/// Accepted `--at` layouts
const AT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Blink period; the clock itself ticks every second tick
const HALF_SECOND: Duration = Duration::from_millis(500);

pub fn parse_at(value: &str) -> Result<NaiveDateTime, String> {
    AT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("invalid time '{value}', expected YYYY-MM-DD HH:MM[:SS]"))
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Paint a scene into a pixmap sized to its paint bounds
pub fn paint_scene(
    scene: &ClockRenderable,
    scale: f32,
    background: Option<Color>,
) -> Result<Pixmap, String> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(format!("scale must be positive, got {scale}"));
    }
    let rect = scene.paint_rect();
    let width = (rect.width * scale).ceil().max(1.0) as u32;
    let height = (rect.height * scale).ceil().max(1.0) as u32;
    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| format!("cannot allocate {width}x{height} pixmap"))?;

    if let Some(bg) = background {
        pixmap.fill(color_from_rgba(bg));
    }
    scene.draw(
        &mut pixmap.as_mut(),
        (-rect.x * scale, -rect.y * scale),
        scale,
    );
    Ok(pixmap)
}

fn save(pixmap: &Pixmap, out: &Path) -> Result<(), String> {
    pixmap
        .save_png(out)
        .map_err(|e| format!("failed to write {}: {e}", out.display()))
}

pub fn render(
    state: &AppState,
    at: Option<&str>,
    scale: Option<f32>,
    out: &Path,
) -> Result<(), String> {
    let at = at.map(parse_at).transpose()?.unwrap_or_else(now);
    let scale = scale.unwrap_or(state.config.scale);

    let mut skin = state.build_skin();
    let scene = skin.process(&at);
    let pixmap = paint_scene(&scene, scale, state.config.background)?;
    save(&pixmap, out)?;

    println!(
        "rendered {} at {} ({}x{}) to {}",
        skin.format(),
        at,
        pixmap.width(),
        pixmap.height(),
        out.display()
    );
    Ok(())
}

pub fn tokens(state: &AppState, format: Option<&str>, at: Option<&str>) -> Result<(), String> {
    let at = at.map(parse_at).transpose()?.unwrap_or_else(now);
    let formatter = match format {
        Some(format) => DateTimeFormatter::new(format).map_err(|e| e.to_string())?,
        None => DateTimeFormatter::lenient(&state.config.skin.time_format),
    };

    for (index, line) in formatter.format(&at).iter().enumerate() {
        println!("line {index}:");
        for token in line {
            let kind = match token.kind {
                TokenKind::Literal => "literal".to_string(),
                TokenKind::Separator => "separator".to_string(),
                TokenKind::Field(d) => format!("field {}", d.name()),
            };
            println!("  {:<12} {:?}", kind, token.text);
        }
    }
    Ok(())
}

pub fn check_format(format: &str) -> Result<(), String> {
    let formatter = DateTimeFormatter::new(format).map_err(|e| e.to_string())?;
    let standard = match TimeFormatOptions::detect(format) {
        Some(_) => "standard",
        None => "custom",
    };
    println!(
        "ok: {} line(s), {standard} format",
        formatter.line_count()
    );
    Ok(())
}

/// Drive the skin like the clock window does: blink every half second,
/// rebuild the scene every second
pub fn tick(state: &AppState, frames: u32, out: Option<&Path>) -> Result<(), String> {
    let mut skin = state.build_skin();
    if !skin.supports_separator_animation() {
        tracing::info!(format = skin.format(), "Format has no separators to animate");
    }

    for frame in 0..frames {
        if frame % 2 == 0 {
            let at = now();
            let scene = skin.process(&at);
            println!(
                "{} separator={} size={:.0}x{:.0}",
                at.format("%H:%M:%S"),
                if skin.separator_visible() { "on" } else { "off" },
                scene.rect().width,
                scene.rect().height
            );
            if let Some(out) = out {
                let pixmap = paint_scene(&scene, state.config.scale, state.config.background)?;
                save(&pixmap, out)?;
            }
        }
        skin.animate_separator();
        std::thread::sleep(HALF_SECOND);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_config(state: &AppState) -> Result<(), String> {
    let text = toml::to_string_pretty(&state.config).map_err(|e| e.to_string())?;
    println!("{text}");
    match TimeFormatOptions::detect(&state.config.skin.time_format) {
        Some(options) => println!("# standard format: {options:?}"),
        None => println!("# custom format"),
    }
    Ok(())
}

pub fn show_config_path() -> Result<(), String> {
    println!("{}", AppState::config_path()?.display());
    Ok(())
}

pub fn set_format(state: &mut AppState, format: &str) -> Result<(), String> {
    DateTimeFormatter::validate(format).map_err(|e| e.to_string())?;
    state.config.skin.time_format = format.to_string();
    state.save()?;
    println!("time format set to {format:?}");
    Ok(())
}

pub fn set_standard_format(state: &mut AppState, options: TimeFormatOptions) -> Result<(), String> {
    apply_standard_format(&mut state.config, options);
    state.save()?;
    println!("time format set to {:?}", state.config.skin.time_format);
    Ok(())
}

fn apply_standard_format(config: &mut AppConfig, options: TimeFormatOptions) {
    config.skin.time_format = options.to_format_string();
    config.skin.layout_config = options.layout_config().to_string();
}

pub fn set_separators(state: &mut AppState, separators: &str) -> Result<(), String> {
    state.config.skin.custom_separators = separators.to_string();
    state.save()?;
    println!("custom separators set to {separators:?}");
    Ok(())
}

pub fn set_layout(state: &mut AppState, layout: &str) -> Result<(), String> {
    parse_layout_config(layout).map_err(|e| e.to_string())?;
    state.config.skin.layout_config = layout.to_string();
    state.save()?;
    println!("layout config set to {layout:?}");
    Ok(())
}

pub fn reset_config(state: &mut AppState) -> Result<(), String> {
    state.config = AppConfig::default();
    state.save()?;
    println!("configuration reset to defaults");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use digiclock_skin::{ClassicSkin, Effect, RenderableFactory, TextEngine};
    use digiclock_types::GlyphSourceConfig;

    #[test]
    fn test_parse_at() {
        let at = parse_at("2024-03-07 13:05:09").unwrap();
        assert_eq!((at.hour(), at.minute(), at.second()), (13, 5, 9));
        assert!(parse_at("2024-03-07T00:00:00").is_ok());
        assert_eq!(parse_at("2024-03-07 08:30").unwrap().minute(), 30);
        assert!(parse_at("tomorrow").is_err());
    }

    #[test]
    fn test_apply_standard_format() {
        let mut config = AppConfig::default();
        let options = TimeFormatOptions {
            use_24h: true,
            show_date: true,
            ..Default::default()
        };
        apply_standard_format(&mut config, options);
        assert_eq!(config.skin.time_format, "HH:mm\\ndd MM yyyy");
        assert_eq!(config.skin.layout_config, "01");
    }

    #[test]
    fn test_paint_scene_fits_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut glyph = Pixmap::new(10, 20).unwrap();
        glyph.fill(tiny_skia::Color::WHITE);
        for d in 0..10 {
            glyph.save_png(dir.path().join(format!("{d}.png"))).unwrap();
        }

        let source = GlyphSourceConfig::Raster {
            path: dir.path().display().to_string(),
            device_pixel_ratio: 1.0,
        };
        let engine = TextEngine::with_database(Default::default());
        let mut skin = ClassicSkin::new(RenderableFactory::new(source, engine));
        skin.set_format("HH").unwrap();

        let scene = skin.process(&parse_at("2024-03-07 09:00").unwrap());
        let pixmap = paint_scene(&scene, 2.0, Some([0, 0, 0, 255])).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 40));
        assert_eq!(pixmap.pixel(39, 39).unwrap().red(), 255);

        assert!(paint_scene(&scene, 0.0, None).is_err());

        // a layout shadow widens the painted area instead of being clipped
        skin.add_layout_effect(Effect::shadow(2.0, 2.0, tiny_skia::Color::BLACK));
        let scene = skin.process(&parse_at("2024-03-07 09:00").unwrap());
        let pixmap = paint_scene(&scene, 2.0, None).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (48, 48));
        let shadow = pixmap.pixel(46, 46).unwrap();
        assert_eq!((shadow.red(), shadow.alpha()), (0, 255));
    }
}
