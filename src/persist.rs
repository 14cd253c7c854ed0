/// Persistence naming and writer
///
/// Maps a confirmed selection to an output filename and a save action:
/// a proposal with zoom > 1.0 is cropped, scaled back to the source
/// dimensions and re-encoded under `<stem>_<zoom>x<ext>`; everything else
/// (explicit original, empty slot, zoom exactly 1.0) copies the source
/// bytes verbatim under the original name. Naming goes through
/// `naming::zoom_suffix` so the writer and the startup scan stay inverse
/// of each other.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

use crate::naming::{split_name, zoom_suffix};
use crate::scan::ImageTask;
use crate::state::session::{CropProposal, Proposals, Selection};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy original to {path}: {source}")]
    CopyOriginal {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Write the chosen variant of `task` into `output_dir`.
///
/// Returns the path written. The output directory is created on demand;
/// an existing file under the same name is overwritten (re-confirming
/// after back-navigation is an accepted double-write).
pub fn persist(
    task: &ImageTask,
    image: &DynamicImage,
    proposals: &Proposals,
    selection: Selection,
    output_dir: &Path,
) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(output_dir).map_err(|source| PersistError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let chosen: Option<&CropProposal> = match selection {
        Selection::First => proposals.first.as_ref(),
        Selection::Second => proposals.second.as_ref(),
        Selection::Original => None,
    };

    match chosen {
        Some(proposal) if proposal.zoom > 1.0 => {
            let (stem, ext) = split_name(&task.file_name);
            let save_name = format!("{}{}{}", stem, zoom_suffix(proposal.zoom), ext);
            let save_path = output_dir.join(&save_name);

            let rect = proposal.rect;
            let cropped = image.crop_imm(rect.left, rect.top, rect.width(), rect.height());
            let resized = cropped.resize_exact(image.width(), image.height(), FilterType::Lanczos3);
            resized.save(&save_path).map_err(|source| PersistError::Encode {
                path: save_path.clone(),
                source,
            })?;

            println!("💾 Saved {}", save_name);
            Ok(save_path)
        }
        // A full-frame crop carries no information: copy the original
        // bytes instead of re-encoding them.
        _ => {
            let save_path = output_dir.join(&task.file_name);
            fs::copy(&task.path, &save_path).map_err(|source| PersistError::CopyOriginal {
                path: save_path.clone(),
                source,
            })?;

            println!("📋 Copied {} (zoom 1.0)", task.file_name);
            Ok(save_path)
        }
    }
}
