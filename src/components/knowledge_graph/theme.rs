//! Visual theming for the knowledge graph.
//!
//! Category colors come from [`super::config::GraphConfig`]; the theme covers
//! everything around them: background, labels and link tinting.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RGB`, `#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			let channel = |i: usize, len: usize| -> Option<u8> {
				let digits = hex.get(i..i + len)?;
				let v = u8::from_str_radix(digits, 16).ok()?;
				Some(if len == 1 { v * 17 } else { v })
			};
			return match hex.len() {
				3 => Some(Color::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
				6 => Some(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
				_ => None,
			};
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let nums: Vec<&str> = body.split(',').map(str::trim).collect();
		if !(3..=4).contains(&nums.len()) {
			return None;
		}
		let r = nums[0].parse().ok()?;
		let g = nums[1].parse().ok()?;
		let b = nums[2].parse().ok()?;
		let a = match nums.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(r, g, b, a))
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Node label style.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	/// Font size in screen pixels.
	pub size: f64,
	/// Gap between the node edge and the label baseline.
	pub offset: f64,
	/// Shadow blur behind label text (0 = none).
	pub shadow_blur: f64,
}

/// Link style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Stroke links with a source-to-target color gradient.
	pub gradient: bool,
	/// Used when `gradient` is off.
	pub color: Color,
	/// Dash and gap lengths; `None` draws solid links.
	pub dash: Option<(f64, f64)>,
	/// Dash travel speed along the link, in graph units per second.
	pub flow_speed: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub label: LabelStyle,
	pub link: LinkStyle,
}

impl Theme {
	/// Deep-space theme with gradient links (default)
	pub fn cosmic() -> Self {
		Self {
			name: "cosmic",
			background: BackgroundStyle {
				color: Color::rgb(6, 8, 20),
				color_secondary: Color::rgb(22, 18, 48),
				use_gradient: true,
				vignette: 0.35,
			},
			label: LabelStyle {
				color: Color::rgb(240, 240, 240),
				size: 12.0,
				offset: 10.0,
				shadow_blur: 10.0,
			},
			link: LinkStyle {
				gradient: true,
				color: Color::rgba(140, 160, 180, 0.8),
				dash: Some((15.0, 10.0)),
				flow_speed: 11.25,
			},
		}
	}

	/// Minimal, ultra-clean theme
	pub fn minimal() -> Self {
		Self {
			name: "minimal",
			background: BackgroundStyle {
				color: Color::rgb(25, 28, 35),
				color_secondary: Color::rgb(25, 28, 35),
				use_gradient: false,
				vignette: 0.0,
			},
			label: LabelStyle {
				color: Color::rgb(220, 224, 230),
				size: 11.0,
				offset: 8.0,
				shadow_blur: 0.0,
			},
			link: LinkStyle {
				gradient: false,
				color: Color::rgba(130, 145, 165, 0.8),
				dash: None,
				flow_speed: 0.0,
			},
		}
	}

	/// Look up a theme by name, falling back to the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"minimal" => Self::minimal(),
			"cosmic" => Self::cosmic(),
			other => {
				log::warn!("knowledge-graph: unknown theme `{other}`, using default");
				Self::default()
			}
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::cosmic()
	}
}
