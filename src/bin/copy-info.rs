use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;
use walkdir::WalkDir;

/// Batch PNG metadata copier
///
/// For every image in the input folder that has a same-named file in the
/// output folder, copies the embedded PNG text chunks (tEXt/iTXt/zTXt)
/// from the source onto the destination. Useful after an editing pass
/// that dropped generation parameters or captions from the files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Folder holding the images with the metadata to copy
    #[arg(short = 'i', long = "input_dir", default_value = "input")]
    input_dir: PathBuf,

    /// Folder holding the same-named images to receive the metadata
    #[arg(short = 'o', long = "output_dir", default_value = "output")]
    output_dir: PathBuf,
}

#[derive(Debug, Error)]
enum CopyInfoError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: png::DecodingError,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: png::EncodingError,
    },
}

fn main() {
    let args = Args::parse();

    for entry in WalkDir::new(&args.input_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let extension = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !matches!(extension.as_str(), "png" | "jpeg" | "jpg") {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let destination = args.output_dir.join(&name);
        if !destination.exists() {
            continue;
        }

        // Text chunks only exist in PNGs; same-named JPEG pairs are skipped
        if extension != "png" {
            println!("Skipping {} (not a PNG)", name);
            continue;
        }

        // Per-file failures never abort the batch
        match copy_png_info(entry.path(), &destination) {
            Ok(0) => println!("No PNG info found in {}", entry.path().display()),
            Ok(count) => println!("Copied {} text chunks onto {}", count, destination.display()),
            Err(error) => eprintln!("Error processing {}: {}", name, error),
        }
    }
}

/// Read the text chunks from `source` and rewrite `destination` with those
/// chunks attached. Returns the number of chunks copied.
fn copy_png_info(source: &Path, destination: &Path) -> Result<usize, CopyInfoError> {
    let texts = read_text_chunks(source)?;
    if texts.is_empty() {
        return Ok(0);
    }

    // Decode the destination fully before truncating it
    let (pixels, width, height, color, depth) = read_pixels(destination)?;

    let file = File::create(destination).map_err(|source| CopyInfoError::Io {
        path: destination.to_path_buf(),
        source,
    })?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(color);
    encoder.set_depth(depth);
    for (keyword, value) in &texts {
        encoder
            .add_text_chunk(keyword.clone(), value.clone())
            .map_err(|source| CopyInfoError::Encode {
                path: destination.to_path_buf(),
                source,
            })?;
    }

    let mut writer = encoder
        .write_header()
        .map_err(|source| CopyInfoError::Encode {
            path: destination.to_path_buf(),
            source,
        })?;
    writer
        .write_image_data(&pixels)
        .map_err(|source| CopyInfoError::Encode {
            path: destination.to_path_buf(),
            source,
        })?;
    writer.finish().map_err(|source| CopyInfoError::Encode {
        path: destination.to_path_buf(),
        source,
    })?;

    Ok(texts.len())
}

/// Collect (keyword, text) pairs from a PNG's tEXt, zTXt, and iTXt chunks.
fn read_text_chunks(path: &Path) -> Result<Vec<(String, String)>, CopyInfoError> {
    let file = File::open(path).map_err(|source| CopyInfoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder
        .read_info()
        .map_err(|source| CopyInfoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let info = reader.info();

    let mut texts = Vec::new();
    for chunk in &info.uncompressed_latin1_text {
        texts.push((chunk.keyword.clone(), chunk.text.clone()));
    }
    for chunk in &info.compressed_latin1_text {
        match chunk.get_text() {
            Ok(text) => texts.push((chunk.keyword.clone(), text)),
            Err(error) => eprintln!("Skipping zTXt chunk in {}: {}", path.display(), error),
        }
    }
    for chunk in &info.utf8_text {
        match chunk.get_text() {
            Ok(text) => texts.push((chunk.keyword.clone(), text)),
            Err(error) => eprintln!("Skipping iTXt chunk in {}: {}", path.display(), error),
        }
    }

    Ok(texts)
}

/// Decode a PNG into memory, expanding palettes so the re-encode is
/// self-contained.
fn read_pixels(
    path: &Path,
) -> Result<(Vec<u8>, u32, u32, png::ColorType, png::BitDepth), CopyInfoError> {
    let file = File::open(path).map_err(|source| CopyInfoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);

    let mut reader = decoder
        .read_info()
        .map_err(|source| CopyInfoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let mut pixels = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut pixels)
        .map_err(|source| CopyInfoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    pixels.truncate(frame.buffer_size());

    let (color, depth) = reader.output_color_type();
    Ok((pixels, frame.width, frame.height, color, depth))
}
