//! Procedurally painted textures
//!
//! Small RGBA images generated at startup so the scene needs no asset files.

use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

const WINE: [u8; 4] = [0x72, 0x2f, 0x37, 0xff];
const GOLD: [u8; 4] = [0xd4, 0xaf, 0x37, 0xff];
const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Fill an sRGB image by evaluating `pixel` at every coordinate.
fn paint(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) -> Image {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&pixel(x, y));
        }
    }
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

fn repeating(mut image: Image) -> Image {
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}

/// Diagonal wine stripes on white, tiling in both directions.
pub fn candy_cane() -> Image {
    const SIZE: u32 = 128;
    const PERIOD: i32 = 40;
    const HALF_WIDTH: f32 = 15.0;

    repeating(paint(SIZE, SIZE, |x, y| {
        // Stripes run along x - y = const; measure across them.
        let offset = (x as i32 - y as i32).rem_euclid(PERIOD) as f32;
        let across = offset.min(PERIOD as f32 - offset) / std::f32::consts::SQRT_2;
        if across <= HALF_WIDTH / std::f32::consts::SQRT_2 {
            WINE
        } else {
            WHITE
        }
    }))
}

/// Wine wrapping paper with a gold ribbon cross.
pub fn gift_wrap() -> Image {
    const SIZE: u32 = 128;
    const RIBBON: std::ops::Range<u32> = 54..74;

    paint(SIZE, SIZE, |x, y| {
        if RIBBON.contains(&x) || RIBBON.contains(&y) {
            GOLD
        } else {
            WINE
        }
    })
}

/// Soft white disc fading to transparent at the edge.
pub fn snowflake() -> Image {
    const SIZE: u32 = 32;
    let center = SIZE as f32 / 2.0;

    paint(SIZE, SIZE, |x, y| {
        let d = Vec2::new(x as f32 + 0.5 - center, y as f32 + 0.5 - center).length();
        let alpha = (1.0 - d / center).clamp(0.0, 1.0);
        [0xff, 0xff, 0xff, (alpha * 255.0).round() as u8]
    })
}

/// Placeholder photo: dark translucent panel inside a gold border.
pub fn photo_card() -> Image {
    const WIDTH: u32 = 512;
    const HEIGHT: u32 = 256;
    const INSET: u32 = 10;
    const STROKE: u32 = 4;
    const PANEL: [u8; 4] = [20, 20, 20, 230];

    paint(WIDTH, HEIGHT, |x, y| {
        let near = |v: u32, edge: u32| v.abs_diff(edge) <= STROKE;
        let within_x = x + STROKE >= INSET && x <= WIDTH - INSET + STROKE;
        let within_y = y + STROKE >= INSET && y <= HEIGHT - INSET + STROKE;
        let on_vertical = (near(x, INSET) || near(x, WIDTH - INSET)) && within_y;
        let on_horizontal = (near(y, INSET) || near(y, HEIGHT - INSET)) && within_x;
        if on_vertical || on_horizontal {
            GOLD
        } else {
            PANEL
        }
    })
}

/// Width over height, falling back when the image has no extent yet.
pub fn aspect_ratio(image: &Image, fallback: f32) -> f32 {
    let size = image.size();
    if size.x == 0 || size.y == 0 {
        fallback
    } else {
        size.x as f32 / size.y as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srgba(image: &Image, x: u32, y: u32) -> Srgba {
        image.get_color_at(x, y).unwrap().to_srgba()
    }

    fn close(a: Srgba, b: [u8; 4]) -> bool {
        let b = Srgba::rgba_u8(b[0], b[1], b[2], b[3]);
        (a.red - b.red).abs() < 0.01
            && (a.green - b.green).abs() < 0.01
            && (a.blue - b.blue).abs() < 0.01
            && (a.alpha - b.alpha).abs() < 0.01
    }

    #[test]
    fn gift_has_ribbon_cross() {
        let image = gift_wrap();
        assert!(close(srgba(&image, 64, 5), GOLD));
        assert!(close(srgba(&image, 5, 64), GOLD));
        assert!(close(srgba(&image, 5, 5), WINE));
    }

    #[test]
    fn candy_cane_alternates_and_tiles() {
        let image = candy_cane();
        assert!(close(srgba(&image, 0, 0), WINE));
        assert!(close(srgba(&image, 20, 0), WHITE));
        assert!(matches!(image.sampler, ImageSampler::Descriptor(_)));
    }

    #[test]
    fn snowflake_fades_out() {
        let image = snowflake();
        assert!(srgba(&image, 16, 16).alpha > 0.9);
        assert!(srgba(&image, 0, 0).alpha < 0.01);
    }

    #[test]
    fn photo_card_has_border() {
        let image = photo_card();
        assert_eq!(aspect_ratio(&image, 1.5), 2.0);
        assert!(close(srgba(&image, 10, 128), GOLD));
        assert!(!close(srgba(&image, 256, 128), GOLD));
    }
}
