//! Card compositor integration tests.
//!
//! These tests verify layer order, the grayscale fade, brush-stroke
//! placement, and the fallbacks for missing assets.

use combat_cards::animation::VisualState;
use combat_cards::core::{CardLayout, CardTheme, Color, EntityId, Size, TemplateId};
use combat_cards::render::{
    assets, AverageAdvance, Bitmap, CardCompositor, DrawCommand, LayerKind, MemoryResources,
    ResourceProvider, PLACEHOLDER_COLOR,
};
use combat_cards::roster::{CombatEntity, EnemyTemplate};

const PAPYRUS: Color = Color::rgb(0xF0, 0xE6, 0xCB);

fn entity(hp: i32, elite: bool) -> CombatEntity {
    let mut template = EnemyTemplate::new(TemplateId::new(2), "Inox Guard", 2, 2, 8)
        .with_hp(hp)
        .with_portrait("portraits/inox");
    template.elite = elite;
    CombatEntity::from_record(EntityId(12), &template.to_record())
}

fn resources() -> MemoryResources {
    MemoryResources::new()
        .with_builtin_solids()
        .with(assets::BACKGROUND_NORMAL, Bitmap::solid(Size::new(4, 4), PAPYRUS))
        .with("portraits/inox", Bitmap::solid(Size::new(4, 4), Color::rgb(40, 90, 200)))
}

fn parts() -> (CardLayout, CardTheme, MemoryResources, AverageAdvance) {
    (CardLayout::default(), CardTheme::default(), resources(), AverageAdvance::default())
}

fn first_image_pixel(frame: &combat_cards::render::CardFrame, kind: LayerKind) -> Color {
    let layer = frame.layer(kind).unwrap();
    let (bitmap, _) = layer.images().next().unwrap();
    bitmap.pixel(0, 0).unwrap()
}

// =============================================================================
// Layers
// =============================================================================

/// Test that a living card has exactly the five base layers.
#[test]
fn test_normal_layer_order() {
    let (layout, theme, res, metrics) = parts();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let frame = compositor.compose(&entity(8, false), VisualState::NORMAL);

    assert_eq!(frame.entity, EntityId(12));
    assert_eq!(
        frame.kinds(),
        vec![
            LayerKind::Background,
            LayerKind::Title,
            LayerKind::Stats,
            LayerKind::Portrait,
            LayerKind::HealthBar,
        ]
    );
}

/// Test that only the first stroke is drawn during its own phase.
#[test]
fn test_first_stroke_only() {
    let (layout, theme, res, metrics) = parts();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let visual = VisualState {
        gray: 1.0,
        first_stroke: Some(0.3),
        second_stroke: None,
    };
    let frame = compositor.compose(&entity(0, false), visual);
    assert_eq!(frame.kinds().last(), Some(&LayerKind::FirstStroke));
    assert!(frame.layer(LayerKind::SecondStroke).is_none());
}

/// Test that the elite flag alone picks the background.
#[test]
fn test_elite_background() {
    let (layout, theme, res, metrics) = parts();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let elite_bg = res
        .resolve(assets::BACKGROUND_ELITE, Size::new(1, 1))
        .unwrap()
        .pixel(0, 0)
        .unwrap();

    let frame = compositor.compose(&entity(8, true), VisualState::NORMAL);
    assert_eq!(first_image_pixel(&frame, LayerKind::Background), elite_bg);

    let frame = compositor.compose(&entity(8, false), VisualState::NORMAL);
    assert_eq!(first_image_pixel(&frame, LayerKind::Background), PAPYRUS);
}

/// Test the outlined title and the id badge.
#[test]
fn test_title_outline_and_badge() {
    let (layout, theme, res, metrics) = parts();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let frame = compositor.compose(&entity(8, true), VisualState::NORMAL);
    let title = frame.layer(LayerKind::Title).unwrap();

    let colors: Vec<Color> = title
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, color, .. } if text == "INOX GUARD" => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(colors.len(), 5);
    assert!(colors[..4].iter().all(|c| *c == theme.outline_color));
    assert_eq!(colors[4], theme.title_color(true));
    assert!(title.texts().any(|t| t == "#12"));
}

// =============================================================================
// Fade
// =============================================================================

/// Test that a half-faded card sits between color and grayscale.
#[test]
fn test_half_fade_blends() {
    let (layout, theme, res, metrics) = parts();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let visual = VisualState {
        gray: 0.5,
        first_stroke: None,
        second_stroke: None,
    };
    let frame = compositor.compose(&entity(0, false), visual);
    let pixel = first_image_pixel(&frame, LayerKind::Background);
    let gray = PAPYRUS.grayscale();

    assert!(pixel.b > PAPYRUS.b && pixel.b < gray.b);
    assert!(pixel.r < PAPYRUS.r && pixel.r > gray.r);
    assert_eq!(pixel.a, 255);
}

/// Test that a fully faded portrait is gray.
#[test]
fn test_full_fade_is_gray() {
    let (layout, theme, res, metrics) = parts();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let frame = compositor.compose(&entity(0, false), VisualState::DEATH_MARKED);
    let pixel = first_image_pixel(&frame, LayerKind::Portrait);
    assert_eq!(pixel.r, pixel.g);
    assert_eq!(pixel.g, pixel.b);
}

// =============================================================================
// Strokes
// =============================================================================

/// Test that both strokes slide from outside the card to its center.
#[test]
fn test_stroke_paths() {
    let (layout, theme, res, metrics) = parts();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let center = layout.center();

    for kind in [LayerKind::FirstStroke, LayerKind::SecondStroke] {
        let start = compositor.stroke_position(kind, 0.0);
        assert!(start.x < 0.0, "{:?} starts left of the card", kind);
        assert_eq!(compositor.stroke_position(kind, 1.0), center);
    }
    assert!(compositor.stroke_position(LayerKind::FirstStroke, 0.0).y > layout.height);
    assert!(compositor.stroke_position(LayerKind::SecondStroke, 0.0).y < 0.0);
}

// =============================================================================
// Fallbacks
// =============================================================================

/// Test that a missing portrait is drawn as a placeholder.
#[test]
fn test_missing_portrait_placeholder() {
    let (layout, theme, metrics) = (CardLayout::default(), CardTheme::default(), AverageAdvance::default());
    let res = MemoryResources::new().with_builtin_solids();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let frame = compositor.compose(&entity(8, false), VisualState::NORMAL);
    assert_eq!(first_image_pixel(&frame, LayerKind::Portrait), PLACEHOLDER_COLOR);
}

/// Test that the card still composes with no assets at all.
#[test]
fn test_no_assets_at_all() {
    let (layout, theme, metrics) = (CardLayout::default(), CardTheme::default(), AverageAdvance::default());
    let res = MemoryResources::new();
    let compositor = CardCompositor::new(&layout, &theme, &res, &metrics);
    let frame = compositor.compose(&entity(0, false), VisualState::DEATH_MARKED);
    assert_eq!(frame.layers.len(), 7);
    assert!(frame
        .layer(LayerKind::HealthBar)
        .unwrap()
        .texts()
        .any(|t| t == theme.death_label));
}
