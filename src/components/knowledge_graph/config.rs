//! Physics and styling configuration.
//!
//! Every field has a default, so a partial JSON object (or none at all) is a
//! valid configuration. Field names are camelCase in JSON.

use std::collections::HashMap;

use log::warn;
use serde::Deserialize;

use super::category::Category;
use super::theme::{Color, Theme};

/// Configuration consumed by the model, layout engine and renderer.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
	/// Base node radius before degree and category adjustments.
	pub node_base_radius: f64,
	/// Extra radius of the hovered node.
	pub node_highlight_radius_increase: f64,
	pub node_stroke_width: f64,
	pub node_highlight_stroke_width: f64,
	/// Opacity of nodes outside the hovered neighborhood.
	pub dimmed_node_opacity: f64,

	/// Rest length of a link between different categories.
	pub link_distance: f64,
	/// Spacing of a same-category link, added to both node radii.
	pub same_category_link_distance: f64,
	/// Default spring strength.
	pub link_strength: f64,
	/// Strength of same-category links and of links between ML and RL.
	pub core_link_strength: f64,
	/// Strength of links touching NLP or CV.
	pub peripheral_link_strength: f64,
	pub link_opacity: f64,
	pub link_highlight_opacity: f64,
	/// Opacity of links not touching the hovered node.
	pub dimmed_link_opacity: f64,
	pub link_stroke_width: f64,
	pub link_highlight_stroke_width: f64,

	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	pub charge_distance_min: f64,
	pub charge_distance_max: f64,
	/// Barnes-Hut accuracy; cells with `width / distance < theta` are aggregated.
	pub barnes_hut_theta: f64,
	/// Node count above which charge and collision use the quadtree.
	pub barnes_hut_threshold: usize,
	pub center_strength: f64,
	/// Added to the visual radius to get the collision radius.
	pub collide_padding: f64,

	pub alpha_decay: f64,
	pub alpha_min: f64,
	/// Alpha the simulation heats toward while a node is dragged.
	pub drag_alpha_target: f64,
	pub velocity_decay: f64,

	/// Fill color per category, as CSS color strings.
	pub node_colors: HashMap<Category, String>,

	/// Directory documents are served from, joined with their filename.
	pub document_base_path: String,
	/// Location of the graph data file.
	pub data_url: String,
	/// Minimum and maximum zoom factor.
	pub zoom_extent: (f64, f64),
	/// Distance between the pointer and the tooltip panel.
	pub tooltip_offset: f64,
	/// Theme name, see [`Theme::by_name`].
	pub theme: String,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			node_base_radius: 14.0,
			node_highlight_radius_increase: 4.0,
			node_stroke_width: 3.0,
			node_highlight_stroke_width: 5.0,
			dimmed_node_opacity: 0.2,

			link_distance: 150.0,
			same_category_link_distance: 70.0,
			link_strength: 0.7,
			core_link_strength: 1.0,
			peripheral_link_strength: 0.4,
			link_opacity: 0.6,
			link_highlight_opacity: 1.0,
			dimmed_link_opacity: 0.05,
			link_stroke_width: 3.0,
			link_highlight_stroke_width: 5.0,

			charge_strength: -500.0,
			charge_distance_min: 1.0,
			charge_distance_max: 300.0,
			barnes_hut_theta: 0.9,
			barnes_hut_threshold: 256,
			center_strength: 0.1,
			collide_padding: 6.0,

			// 1 - 0.001^(1/300): cools from 1 to alpha_min in ~300 ticks
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
			velocity_decay: 0.4,

			node_colors: HashMap::new(),

			document_base_path: "../data/pdfs".to_string(),
			data_url: "../data/processed_data.json".to_string(),
			zoom_extent: (0.1, 8.0),
			tooltip_offset: 20.0,
			theme: "cosmic".to_string(),
		}
	}
}

impl GraphConfig {
	/// Parse a configuration object; missing fields take their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		let mut config: Self = serde_json::from_str(text)?;
		config.zoom_extent = checked_zoom_extent(config.zoom_extent);
		Ok(config)
	}

	/// Fill color for a category: configured color, else the category default.
	pub fn category_color(&self, category: Category) -> Color {
		match self.node_colors.get(&category) {
			Some(css) => Color::parse(css).unwrap_or_else(|| {
				warn!("knowledge-graph: invalid color `{css}` for {category:?}");
				category.visual().color
			}),
			None => category.visual().color,
		}
	}

	pub fn theme(&self) -> Theme {
		Theme::by_name(&self.theme)
	}
}

/// Order a zoom range, falling back to the default for non-positive bounds.
fn checked_zoom_extent((min, max): (f64, f64)) -> (f64, f64) {
	let valid = |k: f64| k.is_finite() && k > 0.0;
	if !valid(min) || !valid(max) {
		warn!("knowledge-graph: invalid zoomExtent [{min}, {max}], using the default");
		return GraphConfig::default().zoom_extent;
	}
	if min > max {
		warn!("knowledge-graph: zoomExtent [{min}, {max}] is reversed");
		return (max, min);
	}
	(min, max)
}
