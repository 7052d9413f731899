//! Node categories and their fixed visual mapping.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::theme::Color;
use super::types::CategoryTag;

/// The closed set of node categories.
///
/// Every category maps to exactly one [`CategoryVisual`]; tags that do not
/// name a known category are flagged as [`Category::Unclassified`] rather than
/// silently folded into another category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Category {
	MachineLearning,
	ReinforcementLearning,
	DeepLearning,
	NaturalLanguage,
	ComputerVision,
	Concept,
	Document,
	Unclassified,
}

/// Shape used to draw a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
	Circle,
	Square,
	Triangle,
	Diamond,
	Star,
}

/// Rendering parameters fixed per category.
#[derive(Clone, Copy, Debug)]
pub struct CategoryVisual {
	pub shape: Shape,
	pub color: Color,
	/// Added to the node's base radius.
	pub radius_bonus: f64,
}

/// A tag that names no known category.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("unknown node category `{0}`")]
pub struct UnknownCategory(pub String);

/// A shape name that is not one of the drawable shapes.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("unknown node shape `{0}`")]
pub struct UnknownShape(pub String);

impl Category {
	/// Position in the numeric 1..5 scheme, from core (ML) to peripheral
	/// (CV). Concepts, documents and unclassified nodes have none.
	pub fn rank(self) -> Option<u8> {
		match self {
			Category::MachineLearning => Some(1),
			Category::ReinforcementLearning => Some(2),
			Category::DeepLearning => Some(3),
			Category::NaturalLanguage => Some(4),
			Category::ComputerVision => Some(5),
			Category::Concept | Category::Document | Category::Unclassified => None,
		}
	}

	pub fn visual(self) -> CategoryVisual {
		let (shape, color, radius_bonus) = match self {
			Category::MachineLearning => (Shape::Circle, Color::rgb(0x00, 0xc4, 0xb8), 0.0),
			Category::ReinforcementLearning => (Shape::Square, Color::rgb(0x66, 0xb3, 0xff), 0.0),
			Category::DeepLearning => (Shape::Triangle, Color::rgb(0xff, 0x98, 0x00), 0.0),
			Category::NaturalLanguage => (Shape::Diamond, Color::rgb(0xe9, 0x1e, 0x63), 0.0),
			Category::ComputerVision => (Shape::Star, Color::rgb(0x9c, 0x27, 0xb0), 0.0),
			Category::Concept => (Shape::Circle, Color::rgb(0x8f, 0xa3, 0xb4), 0.0),
			Category::Document => (Shape::Circle, Color::rgb(0xf0, 0xc0, 0x60), 4.0),
			Category::Unclassified => (Shape::Circle, Color::rgb(0x75, 0x75, 0x75), 0.0),
		};
		CategoryVisual {
			shape,
			color,
			radius_bonus,
		}
	}

	/// Resolve a raw tag; numeric tags 1..5 follow the concept-map convention.
	pub fn from_tag(tag: &CategoryTag) -> Result<Self, UnknownCategory> {
		match tag {
			CategoryTag::Number(1) => Ok(Category::MachineLearning),
			CategoryTag::Number(2) => Ok(Category::ReinforcementLearning),
			CategoryTag::Number(3) => Ok(Category::DeepLearning),
			CategoryTag::Number(4) => Ok(Category::NaturalLanguage),
			CategoryTag::Number(5) => Ok(Category::ComputerVision),
			CategoryTag::Number(n) => Err(UnknownCategory(n.to_string())),
			CategoryTag::Name(name) => name.parse(),
		}
	}
}

impl FromStr for Category {
	type Err = UnknownCategory;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
		match normalized.as_str() {
			"ml" | "machine_learning" => Ok(Category::MachineLearning),
			"rl" | "reinforcement_learning" => Ok(Category::ReinforcementLearning),
			"dl" | "deep_learning" => Ok(Category::DeepLearning),
			"nlp" | "natural_language" | "natural_language_processing" => {
				Ok(Category::NaturalLanguage)
			}
			"cv" | "computer_vision" => Ok(Category::ComputerVision),
			"concept" => Ok(Category::Concept),
			"document" | "doc" | "pdf" => Ok(Category::Document),
			"unclassified" => Ok(Category::Unclassified),
			_ => Err(UnknownCategory(s.to_string())),
		}
	}
}

impl TryFrom<String> for Category {
	type Error = UnknownCategory;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl FromStr for Shape {
	type Err = UnknownShape;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"circle" => Ok(Shape::Circle),
			"square" => Ok(Shape::Square),
			"triangle" => Ok(Shape::Triangle),
			"diamond" => Ok(Shape::Diamond),
			"star" => Ok(Shape::Star),
			_ => Err(UnknownShape(s.to_string())),
		}
	}
}

impl Shape {
	/// Distance from the center to the farthest drawn point, per unit radius.
	pub fn extent(self) -> f64 {
		match self {
			Shape::Circle => 1.0,
			Shape::Square => 1.2,
			Shape::Triangle | Shape::Diamond | Shape::Star => 1.3,
		}
	}

	/// Polygon outline centered on the origin, or `None` for circles.
	pub fn outline(self, radius: f64) -> Option<Vec<(f64, f64)>> {
		use std::f64::consts::{FRAC_PI_2, PI};

		let regular = |sides: usize, r: f64, phase: f64| -> Vec<(f64, f64)> {
			(0..sides)
				.map(|i| {
					let a = phase + i as f64 * 2.0 * PI / sides as f64;
					(r * a.cos(), r * a.sin())
				})
				.collect()
		};

		match self {
			Shape::Circle => None,
			Shape::Square => Some(regular(4, radius * 1.2, PI / 4.0)),
			Shape::Triangle => Some(regular(3, radius * 1.3, -FRAC_PI_2)),
			Shape::Diamond => Some(vec![
				(0.0, -radius * 1.3),
				(radius * 0.8, 0.0),
				(0.0, radius * 1.3),
				(-radius * 0.8, 0.0),
			]),
			Shape::Star => Some(
				(0..10)
					.map(|i| {
						let r = if i % 2 == 0 { radius * 1.3 } else { radius * 0.55 };
						let a = -FRAC_PI_2 + i as f64 * PI / 5.0;
						(r * a.cos(), r * a.sin())
					})
					.collect(),
			),
		}
	}
}
