//! Still-frame export: grab the primary window and hand it back as a PNG
//! data URL.

use std::fmt;
use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bevy::prelude::*;
use bevy::render::view::screenshot::{Screenshot, ScreenshotCaptured};
use image::ImageFormat;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Request a still frame of the primary window.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct CaptureStillFrame;

/// A finished capture, PNG encoded as a data URL.
#[derive(Message, Debug, Clone)]
pub struct StillFrameCaptured {
    pub data_url: String,
}

/// Most recent successful capture.
#[derive(Resource, Debug, Default, Clone)]
pub struct LastStillFrame(pub Option<String>);

#[derive(Debug)]
pub enum CaptureError {
    /// The captured texture format has no image equivalent
    Convert(String),
    Encode(image::ImageError),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert(reason) => write!(f, "could not convert frame: {reason}"),
            Self::Encode(err) => write!(f, "could not encode frame: {err}"),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode(err)
    }
}

/// Encode a rendered frame as a `data:image/png;base64,...` URL.
pub fn encode_png_data_url(frame: &Image) -> Result<String, CaptureError> {
    let dynamic = frame
        .clone()
        .try_into_dynamic()
        .map_err(|e| CaptureError::Convert(e.to_string()))?;

    let mut png = Cursor::new(Vec::new());
    dynamic.write_to(&mut png, ImageFormat::Png)?;
    Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(png.into_inner())))
}

pub struct CapturePlugin;

impl Plugin for CapturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastStillFrame>()
            .add_message::<CaptureStillFrame>()
            .add_message::<StillFrameCaptured>()
            .add_systems(Update, request_still_frames);
    }
}

fn request_still_frames(mut requests: MessageReader<CaptureStillFrame>, mut commands: Commands) {
    // Several requests in one frame still produce one capture.
    if requests.read().count() == 0 {
        return;
    }
    commands
        .spawn(Screenshot::primary_window())
        .observe(store_still_frame);
}

fn store_still_frame(
    captured: On<ScreenshotCaptured>,
    mut last: ResMut<LastStillFrame>,
    mut finished: MessageWriter<StillFrameCaptured>,
) {
    match encode_png_data_url(&captured.image) {
        Ok(data_url) => {
            info!("Captured still frame ({} bytes encoded)", data_url.len());
            last.0 = Some(data_url.clone());
            finished.write(StillFrameCaptured { data_url });
        }
        Err(e) => error!("Still frame capture failed: {}", e),
    }
}
