//! Main Program for Pixscramble
//! Run with `--help` for more instruction

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Error};
use clap::{Parser, ValueEnum};
use image::io::Reader as ImageReader;
use image::save_buffer;
use ndarray::prelude::*;
use pixscramble::Algorithm;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Encrypt,
    Decrypt,
}

#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    /// Scramble or unscramble
    mode: Mode,

    /// Input file
    input: PathBuf,

    /// Scrambling algorithm
    #[arg(short = 'a', long)]
    algorithm: Algorithm,

    /// Key (text for md5 algorithms, real number otherwise)
    #[arg(short = 'k', long)]
    key: Option<String>,

    /// Output file
    #[arg(short = 'o', long)]
    output: PathBuf,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let key = args
        .key
        .as_deref()
        .map(|k| args.algorithm.parse_key(k))
        .transpose()?;

    let im = ImageReader::new(BufReader::new(
        File::open(&args.input).with_context(|| format!("cannot open {}", args.input.display()))?,
    ))
    .with_guessed_format()?
    .decode()?;
    tracing::info!(
        width = im.width(),
        height = im.height(),
        color = ?im.color(),
        "decoded input"
    );

    // Scramble whole pixels, all bytes of a pixel stay together.
    let arr = <ArrayView3<u8>>::from_shape(
        (
            im.height() as usize,
            im.width() as usize,
            im.color().bytes_per_pixel() as usize,
        ),
        im.as_bytes(),
    )?;

    let out = match args.mode {
        Mode::Encrypt => args.algorithm.encrypt(arr, key.as_ref())?,
        Mode::Decrypt => args.algorithm.decrypt(arr, key.as_ref())?,
    };

    let out = out.as_standard_layout();
    save_buffer(
        &args.output,
        out.as_slice().context("output should be standard-layout")?,
        im.width(),
        im.height(),
        im.color(),
    )?;
    tracing::info!(output = %args.output.display(), "saved");

    Ok(())
}
