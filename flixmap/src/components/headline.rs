use artbox::{
    fonts, integrations::ratatui::ArtBox, Alignment as ArtAlignment, Color as ArtColor, ColorStop,
    Fill, LinearGradient, Renderer,
};
use ratatui::{layout::Rect, Frame};

use super::Component;
use crate::action::Action;

/// Ticks for one sweep of the gradient while a search is running.
pub const HEADLINE_CYCLE_TICKS: u32 = 24;

pub const HEADLINE_TEXT: &str = "Where Can I Watch This?";

/// FIGlet title with the red brand gradient. The gradient slides while
/// `is_animating` is set.
pub struct Headline;

pub struct HeadlineProps<'a> {
    pub text: &'a str,
    pub is_animating: bool,
    pub tick_count: u32,
}

const BRAND_DEEP: (u8, u8, u8) = (0xE5, 0x09, 0x14);
const BRAND_LIGHT: (u8, u8, u8) = (0xFF, 0x44, 0x44);

/// Stops sampled along the sweep; more stops give a smoother wave.
const GRADIENT_SAMPLES: usize = 8;

/// A deep-light-deep wave shifted by `phase` (0..1). Each stop mixes the two
/// brand reds by a cosine of its offset, so the pattern wraps seamlessly.
fn sliding_red(angle: f32, phase: f32) -> Fill {
    let deep = ArtColor::rgb(BRAND_DEEP.0, BRAND_DEEP.1, BRAND_DEEP.2);
    let light = ArtColor::rgb(BRAND_LIGHT.0, BRAND_LIGHT.1, BRAND_LIGHT.2);

    let stops = (0..=GRADIENT_SAMPLES)
        .map(|i| {
            let at = i as f32 / GRADIENT_SAMPLES as f32;
            let wave = (at - phase) * std::f32::consts::TAU;
            let mix = 0.5 - 0.5 * wave.cos();
            ColorStop::new(at, deep.interpolate(light, mix))
        })
        .collect();

    Fill::Linear(LinearGradient::new(angle, stops))
}

fn sweep_phase(tick_count: u32) -> f32 {
    match HEADLINE_CYCLE_TICKS {
        0 => 0.0,
        cycle => (tick_count % cycle) as f32 / cycle as f32,
    }
}

impl Component<Action> for Headline {
    type Props<'a> = HeadlineProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let phase = props
            .is_animating
            .then(|| sweep_phase(props.tick_count))
            .unwrap_or_default();

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(sliding_red(135.0, phase));

        frame.render_widget(ArtBox::new(&renderer, props.text), area);
    }
}
