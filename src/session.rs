// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Session state for an interactive front end.
//!
//! A [`Session`] owns the current image, its spectrum, the outputs of the
//! last sweep and the thumbnail chosen for enlargement. The UI maps its
//! buttons onto [`Session::load_path`], [`Session::process`] and
//! [`Session::select`]; the transform itself stays free of state.

use std::path::Path;

use image::GrayImage;

use crate::error::{JitterError, Result};
use crate::intensity::{IntensityImage, PREVIEW_SIZE};
use crate::normalize::FlatPolicy;
use crate::spectrum::CenteredSpectrum;
use crate::sweep::{run_sweep, JitterOutput};

/// Options fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Seed for reproducible sweeps; `None` draws fresh entropy every time.
    pub seed: Option<[u8; 32]>,
    pub flat_policy: FlatPolicy,
}

#[derive(Debug)]
struct LoadedImage {
    image: IntensityImage,
    spectrum: CenteredSpectrum,
}

#[derive(Debug, Default)]
pub struct Session {
    options: SessionOptions,
    loaded: Option<LoadedImage>,
    outputs: Vec<JitterOutput>,
    selected: Option<usize>,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Session { options, ..Default::default() }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Load an image file, replacing any current image and outputs.
    /// On failure the session is left unchanged.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let image = IntensityImage::open(path)?;
        self.load_image(image);
        Ok(())
    }

    /// Load an in-memory image file.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let image = IntensityImage::decode(bytes)?;
        self.load_image(image);
        Ok(())
    }

    /// Replace the current image. The spectrum is computed here, once.
    pub fn load_image(&mut self, image: IntensityImage) {
        let spectrum = CenteredSpectrum::from_image(&image);
        log::info!("loaded {}x{} image", image.width(), image.height());
        self.loaded = Some(LoadedImage { image, spectrum });
        self.outputs.clear();
        self.selected = None;
    }

    /// Whether [`Session::process`] can run.
    pub fn can_process(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn original(&self) -> Option<&IntensityImage> {
        self.loaded.as_ref().map(|l| &l.image)
    }

    pub fn spectrum(&self) -> Option<&CenteredSpectrum> {
        self.loaded.as_ref().map(|l| &l.spectrum)
    }

    /// The original, min-max normalized for display.
    pub fn original_display(&self) -> Option<IntensityImage> {
        self.original().map(|img| img.normalized(self.options.flat_policy))
    }

    /// Run the sweep on the current image, replacing previous outputs.
    ///
    /// # Errors
    /// [`JitterError::NoImageLoaded`] if nothing has been loaded.
    pub fn process(&mut self) -> Result<&[JitterOutput]> {
        let loaded = self.loaded.as_ref().ok_or(JitterError::NoImageLoaded)?;
        let outputs = run_sweep(&loaded.spectrum, self.options.seed, self.options.flat_policy)?;
        self.outputs = outputs;
        self.selected = None;
        Ok(&self.outputs)
    }

    pub fn outputs(&self) -> &[JitterOutput] {
        &self.outputs
    }

    /// Choose the output at `index` (thumbnail position) for enlargement.
    pub fn select(&mut self, index: usize) -> Result<&JitterOutput> {
        let len = self.outputs.len();
        if index >= len {
            return Err(JitterError::IndexOutOfRange { index, len });
        }
        self.selected = Some(index);
        Ok(&self.outputs[index])
    }

    pub fn selected(&self) -> Option<&JitterOutput> {
        self.selected.and_then(|i| self.outputs.get(i))
    }

    /// Enlarged 8-bit render of the selected output.
    pub fn preview(&self) -> Option<GrayImage> {
        self.selected().map(|out| out.image.preview(PREVIEW_SIZE))
    }
}
