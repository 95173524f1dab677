use character_graph::relations::{LinkKind, Role};
use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(21, 22, 30));

    let step = (64.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(70, 70, 92, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Layout coordinates share the canvas origin at zoom 1; zoom scales about
/// the canvas center.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + (world - rect.size() * 0.5) * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom + rect.size() * 0.5
}

pub(super) fn role_color(role: Role) -> Color32 {
    match role {
        Role::Protagonist => Color32::from_rgb(245, 196, 82),
        Role::Antagonist => Color32::from_rgb(214, 84, 96),
        Role::Supporting => Color32::from_rgb(96, 170, 232),
        Role::Mentor => Color32::from_rgb(150, 122, 226),
        Role::Sidekick => Color32::from_rgb(98, 200, 160),
        Role::Other => Color32::from_rgb(150, 156, 170),
    }
}

pub(super) fn link_color(kind: LinkKind) -> Color32 {
    match kind {
        LinkKind::Friend => Color32::from_rgba_unmultiplied(110, 190, 140, 190),
        LinkKind::Lover => Color32::from_rgba_unmultiplied(238, 120, 178, 210),
        LinkKind::Enemy => Color32::from_rgba_unmultiplied(232, 88, 70, 210),
    }
}

/// Line width for a link of the given stored strength.
pub(super) fn link_width(strength: f32, zoom: f32) -> f32 {
    let strength = if strength.is_finite() { strength.clamp(1.0, 10.0) } else { 5.0 };
    ((0.6 + strength * 0.22) * zoom.sqrt()).clamp(0.5, 5.0)
}

/// Shortens a display name to `max_chars` characters, appending an ellipsis.
pub(super) fn short_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_owned();
    }
    let mut label = name.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    label.push('…');
    label
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn identity_view_maps_layout_onto_canvas() {
        let rect = Rect::from_min_size(pos2(200.0, 40.0), vec2(800.0, 600.0));
        assert_eq!(world_to_screen(rect, Vec2::ZERO, 1.0, vec2(0.0, 0.0)), pos2(200.0, 40.0));
        assert_eq!(world_to_screen(rect, Vec2::ZERO, 1.0, vec2(400.0, 300.0)), rect.center());
    }

    #[test]
    fn screen_to_world_inverts_zoomed_view() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let pan = vec2(35.0, -12.0);
        let world = vec2(123.0, 456.0);
        let screen = world_to_screen(rect, pan, 1.7, world);
        assert!((screen_to_world(rect, pan, 1.7, screen) - world).length() < 1e-3);
    }

    #[test]
    fn link_width_grows_with_strength() {
        assert!(link_width(9.0, 1.0) > link_width(2.0, 1.0));
        assert_eq!(link_width(f32::NAN, 1.0), link_width(5.0, 1.0));
    }

    #[test]
    fn short_label_truncates_on_char_boundaries() {
        assert_eq!(short_label("Ada", 8), "Ada");
        assert_eq!(short_label("林黛玉与贾宝玉", 4), "林黛玉…");
    }
}
