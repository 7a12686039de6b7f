//! # Block Editor Surface
//!
//! Stateful controls around exactly one mounted block: hover chrome, a
//! proportional width control and alignment buttons, plus delete.
//!
//! ```text
//!          pointer_enter            open_size_control / set_width_live
//!   Idle ─────────────────▶ Hover ─────────────────────────────────▶ Resizing
//!    ▲   ◀───────────────── │ ▲  ◀──────────────────────────────────── │
//!    │      pointer_leave   │ │              commit_width              │
//!    └──────────────────────┴─┴──────── delete ─────────▶ Deleted ◀────┘
//! ```
//!
//! Dragging only changes the surface's local width. The block itself is
//! written once per commit, once per alignment click, and once at mount when
//! it has no alignment yet.

use pageblocks_model::{
    AttributeDelta, BlockType, ContentBlock, Dimension, PageContent, TextAlign,
};
use serde::{Deserialize, Serialize};

use crate::errors::SurfaceError;
use crate::mutations::{Mutation, MutationError};

const ALIGN_FIELD: &str = "align";
const WIDTH_FIELD: &str = "width";

/// Anything that can resolve and edit blocks by id.
///
/// The surface never holds on to its target; every operation that needs the
/// document receives it explicitly.
pub trait BlockTarget {
    fn block(&self, id: &str) -> Option<&ContentBlock>;

    fn merge(&mut self, id: &str, delta: &AttributeDelta) -> Result<(), MutationError>;

    fn remove(&mut self, id: &str) -> Result<(), MutationError>;
}

impl BlockTarget for PageContent {
    fn block(&self, id: &str) -> Option<&ContentBlock> {
        pageblocks_model::find_block(self, id)
    }

    fn merge(&mut self, id: &str, delta: &AttributeDelta) -> Result<(), MutationError> {
        Mutation::merge(id, delta.clone()).apply(self)
    }

    fn remove(&mut self, id: &str) -> Result<(), MutationError> {
        Mutation::remove(id).apply(self)
    }
}

/// Width range and step of the size control, and the alignment filled in at
/// mount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    #[serde(default = "default_min_width")]
    pub min_width: u32,

    #[serde(default = "default_max_width")]
    pub max_width: u32,

    #[serde(default = "default_width_step")]
    pub width_step: u32,

    #[serde(default = "default_alignment")]
    pub default_alignment: TextAlign,
}

fn default_min_width() -> u32 {
    10
}

fn default_max_width() -> u32 {
    100
}

fn default_width_step() -> u32 {
    5
}

fn default_alignment() -> TextAlign {
    TextAlign::Center
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            max_width: default_max_width(),
            width_step: default_width_step(),
            default_alignment: default_alignment(),
        }
    }
}

impl SurfaceConfig {
    /// Snap `percent` to the step grid, then clamp it into range
    pub fn snap_width(&self, percent: f64) -> u32 {
        let (min, max) = if self.min_width <= self.max_width {
            (self.min_width, self.max_width)
        } else {
            (self.max_width, self.min_width)
        };
        if !percent.is_finite() {
            return max;
        }

        let step = f64::from(self.width_step.max(1));
        let snapped = (percent / step).round() * step;
        snapped.clamp(f64::from(min), f64::from(max)) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceState {
    /// Controls hidden
    Idle,
    /// Controls visible, nothing pending
    Hover,
    /// Size control open with a local, uncommitted width
    Resizing,
    /// Block removed; terminal
    Deleted,
}

/// Read-only snapshot for rendering the surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceView {
    pub block_id: String,
    pub state: SurfaceState,
    pub controls_visible: bool,
    /// Width as persisted in the block
    pub width: Option<Dimension>,
    /// Uncommitted width while resizing, in percent
    pub pending_width: Option<u32>,
    pub alignment: Option<String>,
}

/// Editor surface mounted on one block
#[derive(Debug, Clone)]
pub struct BlockSurface {
    block_id: String,
    block_type: BlockType,
    config: SurfaceConfig,
    state: SurfaceState,
    local_width: Option<u32>,
    commits: usize,
}

impl BlockSurface {
    /// Mount on `block_id`. When the block supports alignment but has none,
    /// the default alignment is merged once, here and never again.
    pub fn mount<T: BlockTarget>(
        block_id: impl Into<String>,
        target: &mut T,
        config: SurfaceConfig,
    ) -> Result<Self, SurfaceError> {
        let block_id = block_id.into();
        let block = target
            .block(&block_id)
            .ok_or_else(|| SurfaceError::NotFound(block_id.clone()))?;
        let block_type = block.block_type();

        let mut surface = Self {
            block_id,
            block_type,
            config,
            state: SurfaceState::Idle,
            local_width: None,
            commits: 0,
        };

        if block_type.has_field(ALIGN_FIELD) && block.attribute(ALIGN_FIELD).is_none() {
            let delta = AttributeDelta::new().set(ALIGN_FIELD, surface.config.default_alignment.as_str());
            target.merge(&surface.block_id, &delta)?;
            surface.commits += 1;
            tracing::debug!(block_id = %surface.block_id, "normalized missing alignment");
        }

        Ok(surface)
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Uncommitted width held by the size control
    pub fn pending_width(&self) -> Option<u32> {
        self.local_width
    }

    /// Number of writes this surface has made to its block
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn view<T: BlockTarget>(&self, target: &T) -> Result<SurfaceView, SurfaceError> {
        self.ensure_live()?;
        let block = self.current_block(target)?;

        Ok(SurfaceView {
            block_id: self.block_id.clone(),
            state: self.state,
            controls_visible: self.state != SurfaceState::Idle,
            width: persisted_width(block),
            pending_width: self.local_width,
            alignment: block
                .attribute(ALIGN_FIELD)
                .and_then(|value| value.as_str().map(str::to_string)),
        })
    }

    pub fn pointer_enter(&mut self) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        if self.state == SurfaceState::Idle {
            self.transition(SurfaceState::Hover);
        }
        Ok(())
    }

    /// Hides the controls; a drag in progress survives leaving the block
    pub fn pointer_leave(&mut self) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        if self.state == SurfaceState::Hover {
            self.transition(SurfaceState::Idle);
        }
        Ok(())
    }

    /// Open the size control, seeding the local width from the persisted one
    pub fn open_size_control<T: BlockTarget>(&mut self, target: &T) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        self.ensure_field(WIDTH_FIELD)?;
        if self.state == SurfaceState::Resizing {
            return Ok(());
        }

        let block = self.current_block(target)?;
        self.local_width = match persisted_width(block) {
            Some(Dimension::Percent(percent)) => Some(self.config.snap_width(percent)),
            _ => None,
        };
        self.transition(SurfaceState::Resizing);
        Ok(())
    }

    /// Move the size control. Only local state changes; returns the snapped
    /// value now held.
    pub fn set_width_live(&mut self, percent: f64) -> Result<u32, SurfaceError> {
        self.ensure_live()?;
        self.ensure_field(WIDTH_FIELD)?;

        let width = self.config.snap_width(percent);
        self.local_width = Some(width);
        if self.state != SurfaceState::Resizing {
            self.transition(SurfaceState::Resizing);
        }
        Ok(width)
    }

    /// Write the local width into the block as `"<n>%"`.
    ///
    /// Returns whether the block was written. Without a pending value, or when
    /// the value equals the persisted width, nothing is written. On failure the
    /// surface stays in `Resizing` with its local value intact.
    pub fn commit_width<T: BlockTarget>(&mut self, target: &mut T) -> Result<bool, SurfaceError> {
        self.ensure_live()?;
        let Some(width) = self.local_width else {
            if self.state == SurfaceState::Resizing {
                self.transition(SurfaceState::Hover);
            }
            return Ok(false);
        };

        let block = self.current_block(target)?;
        let unchanged = persisted_width(block) == Some(Dimension::Percent(f64::from(width)));

        if !unchanged {
            let delta = AttributeDelta::new().set(WIDTH_FIELD, format!("{}%", width));
            target.merge(&self.block_id, &delta)?;
            self.commits += 1;
            tracing::debug!(block_id = %self.block_id, width, "committed width");
        }

        self.local_width = None;
        self.transition(SurfaceState::Hover);
        Ok(!unchanged)
    }

    /// Merge an alignment immediately
    pub fn set_alignment<T: BlockTarget>(&mut self, target: &mut T, align: TextAlign) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        self.ensure_field(ALIGN_FIELD)?;

        let delta = AttributeDelta::new().set(ALIGN_FIELD, align.as_str());
        target.merge(&self.block_id, &delta)?;
        self.commits += 1;
        tracing::debug!(block_id = %self.block_id, align = align.as_str(), "set alignment");
        Ok(())
    }

    /// Remove the block. The surface is unusable afterwards.
    pub fn delete<T: BlockTarget>(&mut self, target: &mut T) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        target.remove(&self.block_id)?;
        self.local_width = None;
        self.transition(SurfaceState::Deleted);
        Ok(())
    }

    fn current_block<'t, T: BlockTarget>(&self, target: &'t T) -> Result<&'t ContentBlock, SurfaceError> {
        target
            .block(&self.block_id)
            .ok_or_else(|| SurfaceError::NotFound(self.block_id.clone()))
    }

    fn ensure_live(&self) -> Result<(), SurfaceError> {
        if self.state == SurfaceState::Deleted {
            return Err(SurfaceError::Deleted);
        }
        Ok(())
    }

    fn ensure_field(&self, field: &'static str) -> Result<(), SurfaceError> {
        if !self.block_type.has_field(field) {
            return Err(SurfaceError::Unsupported {
                block_type: self.block_type,
                field,
            });
        }
        Ok(())
    }

    fn transition(&mut self, to: SurfaceState) {
        tracing::debug!(block_id = %self.block_id, from = ?self.state, to = ?to, "surface transition");
        self.state = to;
    }
}

fn persisted_width(block: &ContentBlock) -> Option<Dimension> {
    block
        .attribute(WIDTH_FIELD)
        .and_then(|value| serde_json::from_value(value).ok())
}
