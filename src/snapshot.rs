//! Rasterise the disc stage of a [`Scene`] to an image.

use std::path::Path;

use resvg::tiny_skia;
use resvg::usvg;

use crate::scene::{ids, Scene};
use crate::{Error, Result};

pub const STAGE_WIDTH: u32 = 420;
pub const STAGE_HEIGHT: u32 = 240;

pub const BACKGROUND: [u8; 3] = [0x0b, 0x10, 0x20];
pub const DISC_FILL: [u8; 3] = [0x8a, 0xb4, 0xf8];

/// Vertical position of the floor the shadow sits on
const FLOOR_Y: f64 = 214.0;

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Build the SVG document for the current stage.
///
/// Elements missing from the scene are left out of the drawing.
pub fn stage_svg(scene: &Scene) -> String {
    let mut body = String::new();

    if let Some(shadow) = scene.get(ids::DISC_SHADOW) {
        let rx = shadow.attr_f64("rx").unwrap_or(0.0);
        let ry = shadow.attr_f64("ry").unwrap_or(0.0);
        let anchor_x = scene
            .get(ids::DISC_SIM)
            .map_or(STAGE_WIDTH as f64 / 2.0, |disc| disc.transform().translate.0);
        body.push_str(&format!(
            r##"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="#000000" fill-opacity="{}"/>"##,
            anchor_x,
            FLOOR_Y,
            rx,
            ry,
            shadow.opacity()
        ));
    }

    if let Some(disc) = scene.get(ids::DISC_SIM) {
        let circle = scene.get(ids::DISC_CIRCLE);
        let radius = circle.and_then(|c| c.attr_f64("r")).unwrap_or(40.0);
        let diameter = radius * 2.0;
        let spin = circle
            .map(|c| c.transform().to_svg(diameter, diameter))
            .unwrap_or_default();

        body.push_str(&format!(
            r#"<g transform="{}"><g transform="translate({} {})"><g transform="{}">"#,
            disc.transform().to_svg(0.0, 0.0),
            -radius,
            -radius,
            spin
        ));
        body.push_str(&format!(
            r#"<circle cx="{r}" cy="{r}" r="{r}" fill="{}"/>"#,
            hex(DISC_FILL),
            r = radius
        ));
        // Marker near the rim so rotation is visible
        body.push_str(&format!(
            r##"<rect x="{}" y="{}" width="4" height="{}" fill="#ffffff"/>"##,
            radius - 2.0,
            radius * 0.2,
            radius * 0.4
        ));
        body.push_str("</g></g></g>");
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="{}"/>{}</svg>"#,
        hex(BACKGROUND),
        body,
        w = STAGE_WIDTH,
        h = STAGE_HEIGHT
    )
}

/// Render the stage into a pixmap at 1:1 scale.
pub fn render_pixmap(scene: &Scene) -> Result<tiny_skia::Pixmap> {
    let svg = stage_svg(scene);
    let tree = usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default())
        .map_err(|err| Error::Snapshot(err.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(STAGE_WIDTH, STAGE_HEIGHT)
        .ok_or_else(|| Error::Snapshot("invalid pixmap size".to_string()))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Render the stage as an RGBA image.
pub fn render_image(scene: &Scene) -> Result<image::RgbaImage> {
    let pixmap = render_pixmap(scene)?;
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();

    image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| Error::Snapshot("pixel buffer size mismatch".to_string()))
}

/// Render the stage and write it as a PNG.
pub fn save_png(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let image = render_image(scene)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("Stage snapshot saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    fn rgb(image: &image::RgbaImage, x: u32, y: u32) -> [u8; 3] {
        let pixel = image.get_pixel(x, y);
        [pixel[0], pixel[1], pixel[2]]
    }

    #[test]
    fn test_resting_disc() {
        let image = render_image(&Scene::page()).unwrap();

        assert_eq!(image.dimensions(), (STAGE_WIDTH, STAGE_HEIGHT));
        assert_eq!(rgb(&image, 2, 2), BACKGROUND);
        assert_eq!(rgb(&image, 210, 160), DISC_FILL);
        assert_eq!(rgb(&image, 210, 190), DISC_FILL);
    }

    #[test]
    fn test_levitated_disc_moves_up() {
        let mut scene = Scene::page();
        scene
            .get_mut(ids::DISC_SIM)
            .unwrap()
            .set_transform(Transform::translate(210.0, 106.0));

        let image = render_image(&scene).unwrap();
        assert_eq!(rgb(&image, 210, 106), DISC_FILL);
        assert_eq!(rgb(&image, 210, 190), BACKGROUND);
    }

    #[test]
    fn test_missing_elements_are_skipped() {
        let mut scene = Scene::page();
        scene.remove(ids::DISC_SIM);
        scene.remove(ids::DISC_SHADOW);

        let svg = stage_svg(&scene);
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains("<ellipse"));
        let image = render_image(&scene).unwrap();
        assert_eq!(rgb(&image, 210, 160), BACKGROUND);
    }

    #[test]
    fn test_save_png() {
        let path = std::env::temp_dir().join(format!("meissner-stage-{}.png", std::process::id()));
        save_png(&Scene::page(), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (STAGE_WIDTH, STAGE_HEIGHT));
        std::fs::remove_file(&path).unwrap();
    }
}
