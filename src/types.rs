//! Shared types and enums used across zaytools.
//! Includes the resampling `ResampleFilter` and the prober's `ProbeOutcome`.
use clap::ValueEnum;
use fast_image_resize::{FilterType, ResizeAlg};
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Bilinear,
    CatmullRom,
    Mitchell,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn resize_alg(self) -> ResizeAlg {
        match self {
            ResampleFilter::Nearest => ResizeAlg::Nearest,
            ResampleFilter::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
            ResampleFilter::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
            ResampleFilter::Mitchell => ResizeAlg::Convolution(FilterType::Mitchell),
            ResampleFilter::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResampleFilter::Nearest => "Nearest",
            ResampleFilter::Bilinear => "Bilinear",
            ResampleFilter::CatmullRom => "CatmullRom",
            ResampleFilter::Mitchell => "Mitchell",
            ResampleFilter::Lanczos3 => "Lanczos3",
        };
        write!(f, "{}", s)
    }
}

/// Why the engine read loop stopped.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// A line containing the sentinel token arrived.
    SentinelFound,
    /// The engine closed its output stream before the sentinel.
    StreamClosed,
    /// The deadline passed without the sentinel.
    TimedOut,
}

impl std::fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::SentinelFound => write!(f, "SentinelFound"),
            ProbeOutcome::StreamClosed => write!(f, "StreamClosed"),
            ProbeOutcome::TimedOut => write!(f, "TimedOut"),
        }
    }
}
