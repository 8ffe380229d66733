//! Owner-facing configuration: the props a blocking region is driven by, and
//! the command line of the interactive demo.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_MESSAGE: &str = "Please wait";

/// Props supplied by the owner of a blocking region.
///
/// Only `blocking` and `keep_in_view` drive the controller; the rest is
/// forwarded to the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockProps {
    pub blocking: bool,
    pub keep_in_view: bool,
    /// Keep the underlying content on screen while blocked.
    pub render_children: bool,
    pub class_name: Option<String>,
    pub message: Option<String>,
    /// Pass-through attributes for the region's root element.
    pub attributes: Vec<(String, String)>,
}

impl Default for BlockProps {
    fn default() -> Self {
        Self {
            blocking: false,
            keep_in_view: false,
            render_children: true,
            class_name: None,
            message: None,
            attributes: Vec::new(),
        }
    }
}

impl BlockProps {
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn keep_in_view(mut self, keep_in_view: bool) -> Self {
        self.keep_in_view = keep_in_view;
        self
    }

    pub fn render_children(mut self, render_children: bool) -> Self {
        self.render_children = render_children;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Class list of the region root: `block-ui` is prepended while blocking.
    pub fn classes(&self) -> String {
        let class_name = self.class_name.as_deref().unwrap_or_default();
        if self.blocking {
            format!("block-ui {}", class_name).trim_end().to_string()
        } else {
            class_name.to_string()
        }
    }

    pub fn aria_busy(&self) -> bool {
        self.blocking
    }

    pub fn renders_children(&self) -> bool {
        !self.blocking || self.render_children
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "block-ui",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scrollable terminal page with a blockable region"
)]
pub struct DemoCli {
    /// Keep the busy message inside the visible part of the region.
    #[arg(short = 'k', long = "keep-in-view")]
    pub keep_in_view: bool,

    /// Hide the region's content while it is blocked.
    #[arg(long = "no-render-children")]
    pub no_render_children: bool,

    /// Text shown next to the spinner.
    #[arg(short = 'm', long = "message", value_name = "TEXT")]
    pub message: Option<String>,

    #[arg(long = "class-name", value_name = "NAME")]
    pub class_name: Option<String>,

    /// Event loop tick, also the spinner frame interval.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 50)]
    pub tick_ms: u64,

    /// Write debug logs to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tick must be between 10 and 1000 ms, got {0}")]
    TickOutOfRange(u64),
    #[error("message must not be empty")]
    EmptyMessage,
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub props: BlockProps,
    pub tick: Duration,
    pub log_file: Option<PathBuf>,
}

impl TryFrom<&DemoCli> for DemoConfig {
    type Error = ConfigError;

    fn try_from(cli: &DemoCli) -> Result<Self, Self::Error> {
        if !(10..=1000).contains(&cli.tick_ms) {
            return Err(ConfigError::TickOutOfRange(cli.tick_ms));
        }
        if cli.message.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ConfigError::EmptyMessage);
        }
        let mut props = BlockProps::default()
            .keep_in_view(cli.keep_in_view)
            .render_children(!cli.no_render_children)
            .message(cli.message.as_deref().unwrap_or(DEFAULT_MESSAGE));
        props.class_name = cli.class_name.clone();
        Ok(Self {
            props,
            tick: Duration::from_millis(cli.tick_ms),
            log_file: cli.log_file.clone(),
        })
    }
}
