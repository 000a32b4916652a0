use crate::components::entity::{Entity, Visual};
use crate::components::text::TextAlign;
use crate::renderer::instance::{InstanceKind, RenderBuffer, RenderInstance, RenderLabel};

/// Build the render buffer from entities already sorted back-to-front.
/// Inactive and invisible entities are skipped.
pub fn build_render_buffer<'a>(entities: impl IntoIterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities {
        if !entity.active {
            continue;
        }
        let visual = match &entity.visual {
            Some(v) => v,
            None => continue,
        };

        let center = entity.center();
        let size = entity.display_size();
        let mut instance = RenderInstance {
            x: center.x,
            y: center.y,
            width: size.x,
            height: size.y,
            rotation: entity.rotation,
            alpha: entity.alpha,
            label: -1.0,
            ..Default::default()
        };

        match visual {
            Visual::Image(image) => {
                instance.kind = InstanceKind::Image as u8 as f32;
                instance.label = buffer.push_label(RenderLabel {
                    text: image.key.clone(),
                    font: String::new(),
                    align: String::new(),
                });
            }
            Visual::Text(text) => {
                let style = &text.style;
                instance.kind = InstanceKind::Text as u8 as f32;
                instance.fill = style.color.as_f32();
                instance.stroke = style.stroke.as_f32();
                instance.stroke_width = style.stroke_thickness;
                instance.font_size = style.font_size;
                instance.label = buffer.push_label(RenderLabel {
                    text: text.content.clone(),
                    font: style.font_family.clone(),
                    align: align_name(style.align).to_string(),
                });
            }
            Visual::Circle(circle) => {
                instance.kind = InstanceKind::Circle as u8 as f32;
                instance.fill = circle.fill.as_f32();
            }
        }

        if !buffer.push(instance) {
            log::warn!("render: instance buffer full, dropping the rest of the frame");
            break;
        }
    }
}

fn align_name(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Color, EntityId};
    use crate::components::image::ImageComponent;
    use crate::components::shape::CircleComponent;
    use crate::components::text::{TextComponent, TextStyle};
    use crate::core::scene::Scene;
    use glam::Vec2;

    #[test]
    fn draws_in_depth_order_with_labels() {
        let mut scene = Scene::new();
        scene.spawn(
            Entity::new(EntityId(1))
                .with_depth(100.0)
                .with_visual(Visual::Text(TextComponent::new(
                    "hi",
                    TextStyle::new("Arial Black", 38.0).with_align(TextAlign::Center),
                ))),
        );
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(512.0, 384.0))
                .with_visual(Visual::Image(ImageComponent::new("background", Vec2::new(1024.0, 768.0)))),
        );

        let mut buffer = RenderBuffer::new();
        build_render_buffer(scene.by_depth(), &mut buffer);

        assert_eq!(buffer.instance_count(), 2);
        assert_eq!(buffer.instances[0].kind, InstanceKind::Image as u8 as f32);
        assert_eq!(buffer.labels[0].text, "background");
        assert_eq!(buffer.instances[1].label, 1.0);
        assert_eq!(buffer.labels[1].font, "Arial Black");
        assert_eq!(buffer.labels[1].align, "center");
        assert_eq!(buffer.instances[1].font_size, 38.0);
    }

    #[test]
    fn circles_have_no_label() {
        let entities = vec![Entity::new(EntityId(1))
            .with_scale(Vec2::splat(2.0))
            .with_visual(Visual::Circle(CircleComponent::new(10.0, Color(0xff0000))))];
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&entities, &mut buffer);

        let inst = buffer.instances[0];
        assert_eq!(inst.label, -1.0);
        assert_eq!(inst.width, 40.0);
        assert_eq!(inst.fill, 0xff0000 as f32);
    }

    #[test]
    fn inactive_and_invisible_entities_are_skipped() {
        let mut hidden = Entity::new(EntityId(1))
            .with_visual(Visual::Circle(CircleComponent::new(5.0, Color::WHITE)));
        hidden.active = false;
        let entities = vec![hidden, Entity::new(EntityId(2))];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(&entities, &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
