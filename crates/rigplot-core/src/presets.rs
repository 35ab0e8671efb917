use std::path::Path;

use once_cell::sync::Lazy;
use rigplot_parser::{DataFrame, FilterMode, LoadConfig, LoadedSeries};

use crate::chart::ChartSpec;
use crate::error::{PipelineError, Result};

/// One CSV field of a rig recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Column name used in tabular views.
    pub name: &'static str,
    /// Legend label when the channel is plotted.
    pub label: &'static str,
}

const fn channel(name: &'static str, label: &'static str) -> ChannelSpec {
    ChannelSpec { name, label }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetTitle {
    /// Use the last header field, or `fallback` when the file has none.
    Header { fallback: &'static str },
    Fixed(&'static str),
}

/// A rig recording layout together with the filter and chart used to inspect it.
///
/// Channel 0 is always the time axis.
#[derive(Debug, Clone)]
pub struct PlotPreset {
    pub code: &'static str,
    pub description: &'static str,
    pub default_file: &'static str,
    pub channels: &'static [ChannelSpec],
    pub mode: FilterMode,
    pub plotted: &'static [usize],
    pub y_label: Option<&'static str>,
    pub title: PresetTitle,
}

const ENCODER_CHANNELS: &[ChannelSpec] = &[
    channel("time_s", "Time [s]"),
    channel("current_a", "Current [A]"),
    channel("torque_nm", "Torque [Nm]"),
    channel("angle_deg", "Angle [Degrees]"),
];

const ENCODER_VR_CHANNELS: &[ChannelSpec] = &[
    channel("time_s", "Time [s]"),
    channel("current_a", "Current [A]"),
    channel("torque_nm", "Torque [Nm]"),
    channel("vr_angle_deg", "VR Angle"),
    channel("encoder_angle_deg", "Encoder Angle"),
];

const HEIGHT_CHANNELS: &[ChannelSpec] = &[
    channel("time_s", "Time [s]"),
    channel("height_m", "Height [m]"),
];

const CONTROLLER_Z_TITLE: &str = "Controller Z Coordinate";

static PRESETS: Lazy<Vec<PlotPreset>> = Lazy::new(|| {
    vec![
        PlotPreset {
            code: "encoder-spring",
            description: "Virtual spring on the motor encoder: current, torque and angle",
            default_file: "encoder_test4.csv",
            channels: ENCODER_CHANNELS,
            mode: FilterMode::Passthrough,
            plotted: &[1, 2, 3],
            y_label: None,
            title: PresetTitle::Header { fallback: "k = 6" },
        },
        PlotPreset {
            code: "encoder-vs-vr",
            description: "Encoder angle aligned to the VR controller angle once tracking starts",
            default_file: "test5_no_motion.csv",
            channels: ENCODER_VR_CHANNELS,
            mode: FilterMode::offset_calibrated(),
            plotted: &[4, 3],
            y_label: Some("Angle [deg]"),
            title: PresetTitle::Header {
                fallback: "Encoder vs VR angle",
            },
        },
        PlotPreset {
            code: "controller-height",
            description: "Raw controller height from the drum scene",
            default_file: "drum_height.csv",
            channels: HEIGHT_CHANNELS,
            mode: FilterMode::Passthrough,
            plotted: &[1],
            y_label: None,
            title: PresetTitle::Fixed(CONTROLLER_Z_TITLE),
        },
        PlotPreset {
            code: "height-average",
            description: "Controller height averaged over blocks of three samples",
            default_file: "test6.csv",
            channels: HEIGHT_CHANNELS,
            mode: FilterMode::moving_average(),
            plotted: &[1],
            y_label: None,
            title: PresetTitle::Fixed(CONTROLLER_Z_TITLE),
        },
        PlotPreset {
            code: "height-lowpass",
            description: "Controller height with tracking jumps faster than 1 m/s removed",
            default_file: "test11.csv",
            channels: HEIGHT_CHANNELS,
            mode: FilterMode::derivative_threshold(),
            plotted: &[1],
            y_label: None,
            title: PresetTitle::Fixed(CONTROLLER_Z_TITLE),
        },
    ]
});

pub fn all_presets() -> &'static [PlotPreset] {
    PRESETS.as_slice()
}

pub fn find_preset(code: &str) -> Result<&'static PlotPreset> {
    all_presets()
        .iter()
        .find(|preset| preset.code.eq_ignore_ascii_case(code.trim()))
        .ok_or_else(|| PipelineError::UnknownPreset(code.to_string()))
}

impl PlotPreset {
    pub fn expected_fields(&self) -> usize {
        self.channels.len()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|channel| channel.name).collect()
    }

    pub fn load_config(&self, path: impl AsRef<Path>) -> LoadConfig {
        LoadConfig::new(path.as_ref(), self.expected_fields(), self.mode)
    }

    pub fn resolve_title(&self, dataset: &LoadedSeries) -> String {
        match self.title {
            PresetTitle::Header { fallback } => dataset
                .title
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
            PresetTitle::Fixed(title) => title.to_string(),
        }
    }

    /// Time on x, one legend entry per plotted channel.
    pub fn chart(&self, dataset: &LoadedSeries) -> ChartSpec {
        let column = |idx: usize| dataset.series(idx).map(<[f64]>::to_vec).unwrap_or_default();

        let mut chart = ChartSpec::new(self.resolve_title(dataset), column(0));
        if let Some(y_label) = self.y_label {
            chart = chart.with_y_label(y_label);
        }
        for &idx in self.plotted {
            chart = chart.with_line(self.channels[idx].label, column(idx));
        }
        chart
    }

    pub fn dataframe(&self, dataset: &LoadedSeries) -> Result<DataFrame> {
        Ok(dataset.to_dataframe(&self.column_names())?)
    }
}
