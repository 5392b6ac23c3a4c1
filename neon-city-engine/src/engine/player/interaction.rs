use bevy::prelude::*;

use constants::city_layout::INTERACT_DISTANCE;
use constants::palette::{POINTER_COLOR, hex_color};

use crate::engine::camera::follow_camera::FollowCamera;
use crate::engine::mesh::flat_shapes::pointer_triangle;
use crate::engine::player::controller::Player;

/// How far along +X the player steps out of a car.
pub const EXIT_OFFSET: f32 = 3.0;
const POINTER_HEIGHT: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractableKind {
    Car,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Interactable {
    pub kind: InteractableKind,
}

/// Floating marker over `target`, shown while the player is close enough to use it.
#[derive(Component, Debug)]
pub struct InteractionPointer {
    pub target: Entity,
}

pub fn within_reach(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < INTERACT_DISTANCE
}

/// Resolves one press of the interact key and returns the player's new position.
pub fn interact(player: &mut Player, position: Vec3, targets: &[(InteractableKind, Vec3)]) -> Vec3 {
    if player.inside_car {
        player.inside_car = false;
        return position + Vec3::X * EXIT_OFFSET;
    }

    let car = targets
        .iter()
        .find(|(kind, at)| *kind == InteractableKind::Car && within_reach(position, *at));
    match car {
        Some((_, at)) => {
            player.inside_car = true;
            *at
        }
        None => position,
    }
}

pub fn spawn_interaction_pointer(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    target: Entity,
) -> Entity {
    commands
        .spawn((
            Name::new("Interaction Pointer"),
            InteractionPointer { target },
            Mesh3d(meshes.add(pointer_triangle())),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: hex_color(POINTER_COLOR),
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            })),
            Transform::default(),
            Visibility::Hidden,
        ))
        .id()
}

/// E enters a nearby car or steps back out.
pub fn interaction_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut players: Query<(&mut Player, &mut Transform, &mut Visibility)>,
    interactables: Query<(&Interactable, &Transform), Without<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    let targets: Vec<_> = interactables
        .iter()
        .map(|(interactable, transform)| (interactable.kind, transform.translation))
        .collect();

    for (mut player, mut transform, mut visibility) in &mut players {
        let was_inside = player.inside_car;
        transform.translation = interact(&mut player, transform.translation, &targets);
        if player.inside_car != was_inside {
            *visibility = if player.inside_car {
                Visibility::Hidden
            } else {
                Visibility::Visible
            };
            info!("Player {} car", if player.inside_car { "entered" } else { "left" });
        }
    }
}

pub fn interaction_pointer_system(
    players: Query<&Transform, With<Player>>,
    targets: Query<&Transform, (With<Interactable>, Without<Player>)>,
    cameras: Query<&Transform, (With<FollowCamera>, Without<Player>, Without<Interactable>)>,
    mut pointers: Query<
        (&InteractionPointer, &mut Transform, &mut Visibility),
        (Without<Player>, Without<Interactable>, Without<FollowCamera>),
    >,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let eye = cameras.single().map(|c| c.translation).ok();

    for (pointer, mut transform, mut visibility) in &mut pointers {
        let Ok(target) = targets.get(pointer.target) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        if !within_reach(player.translation, target.translation) {
            *visibility = Visibility::Hidden;
            continue;
        }

        *visibility = Visibility::Visible;
        transform.translation = target.translation + Vec3::Y * POINTER_HEIGHT;
        if let Some(eye) = eye {
            transform.look_at(eye, Vec3::Y);
        }
    }
}
