//! Turns building plans into entity hierarchies.
//!
//! Each building is a parent at its centre with every part as a child, so the
//! plan's building-local coordinates are used unchanged.

use bevy::math::Affine2;
use bevy::prelude::*;

use constants::palette::{
    ANTENNA_COLOR, BUILDING_EDGE_COLOR, DOOR_NEON_COLOR, NEON_COLORS, WINDOW_FRAME_COLOR,
    hex_color, hex_emissive,
};
use constants::render_settings::EMISSIVE_SCALE;

use crate::engine::mesh::neon_lines::{box_edges, line_segments};
use crate::engine::scene::building_plan::{AdPlan, BuildingPlan, Facade, WindowSlot};
use crate::engine::scene::placement::BuildingFootprint;
use crate::engine::systems::advertisement::{AdMaterials, TEXT_STRIP_SHARE};

const WINDOW_STANDOFF: f32 = 0.05;
const PANE_STANDOFF: f32 = WINDOW_STANDOFF + 0.06;
const BANNER_STANDOFF: f32 = 0.1;
const DOOR_STANDOFF: f32 = 0.05;
const FRAME_STANDOFF: f32 = 0.1;
const NEON_STANDOFF: f32 = 0.22;
const FRAME_BAR_WIDTH: f32 = 0.3;
const FRAME_BAR_THICKNESS: f32 = 0.2;

#[derive(Component, Debug, Clone, Copy)]
pub struct Building {
    pub footprint: BuildingFootprint,
}

#[derive(Component)]
pub struct AdvertisementBand;

/// Materials and meshes reused across every building.
pub struct BuildingKit {
    edge: Handle<StandardMaterial>,
    door: Handle<StandardMaterial>,
    door_frame: Handle<StandardMaterial>,
    door_neon: Handle<StandardMaterial>,
    window_frame: Handle<StandardMaterial>,
    panes: Vec<Handle<StandardMaterial>>,
    antenna: Handle<StandardMaterial>,
    window_frame_mesh: Handle<Mesh>,
    pane_mesh: Handle<Mesh>,
    brick: Option<Handle<Image>>,
    ads: AdMaterials,
}

impl BuildingKit {
    pub fn new(
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        brick: Option<Handle<Image>>,
        ads: AdMaterials,
    ) -> Self {
        let glowing_line = |materials: &mut Assets<StandardMaterial>, hex: u32| {
            materials.add(StandardMaterial {
                base_color: Color::LinearRgba(hex_emissive(hex, 1.5)),
                unlit: true,
                ..default()
            })
        };

        let panes = NEON_COLORS
            .iter()
            .map(|&hex| {
                materials.add(StandardMaterial {
                    base_color: hex_color(hex).with_alpha(0.95),
                    emissive: hex_emissive(hex, 2.5 * EMISSIVE_SCALE),
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                })
            })
            .collect();

        Self {
            edge: glowing_line(materials, BUILDING_EDGE_COLOR),
            door: materials.add(StandardMaterial {
                base_color: hex_color(0x333333),
                perceptual_roughness: 0.4,
                reflectance: 0.6,
                ..default()
            }),
            door_frame: materials.add(StandardMaterial {
                base_color: hex_color(0x555555),
                perceptual_roughness: 0.3,
                reflectance: 0.8,
                ..default()
            }),
            door_neon: glowing_line(materials, DOOR_NEON_COLOR),
            window_frame: materials.add(StandardMaterial {
                base_color: hex_color(WINDOW_FRAME_COLOR),
                metallic: 0.8,
                perceptual_roughness: 0.2,
                ..default()
            }),
            panes,
            antenna: materials.add(StandardMaterial {
                base_color: hex_color(ANTENNA_COLOR),
                ..default()
            }),
            window_frame_mesh: meshes.add(Cuboid::new(1.0, 1.0, 0.1)),
            pane_mesh: meshes.add(Rectangle::new(0.8, 0.8)),
            brick,
            ads,
        }
    }

    fn body_material(&self, plan: &BuildingPlan) -> StandardMaterial {
        let [r, g, b] = plan.tint;
        match &self.brick {
            Some(brick) => StandardMaterial {
                base_color: Color::srgb(r, g, b),
                base_color_texture: Some(brick.clone()),
                uv_transform: Affine2::from_scale(Vec2::new(
                    plan.width.max(plan.depth) / 4.0,
                    plan.height / 8.0,
                )),
                ..default()
            },
            None => StandardMaterial {
                base_color: Color::srgb(r, g, b),
                perceptual_roughness: 0.8,
                ..default()
            },
        }
    }
}

/// Spawns one building and returns its root entity.
pub fn spawn_building(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    kit: &BuildingKit,
    plan: &BuildingPlan,
) -> Entity {
    let size = Vec3::new(plan.width, plan.height, plan.depth);
    let body_mesh = meshes.add(Cuboid::from_size(size));
    let body_material = materials.add(kit.body_material(plan));
    let edge_mesh = meshes.add(box_edges(size));

    let door_meshes = DoorMeshes::new(meshes, plan);
    let banner_meshes = plan
        .advertisement
        .map(|ad| BannerMeshes::new(meshes, plan, ad));
    let antenna_mesh = plan
        .antenna_height
        .map(|h| (h, meshes.add(Cylinder::new(0.1, h).mesh().resolution(4))));

    commands
        .spawn((
            Building {
                footprint: plan.footprint(),
            },
            Transform::from_translation(plan.center()),
            Visibility::default(),
        ))
        .with_children(|building| {
            building.spawn((Mesh3d(body_mesh), MeshMaterial3d(body_material)));
            building.spawn((Mesh3d(edge_mesh), MeshMaterial3d(kit.edge.clone())));

            door_meshes.spawn(building, kit, plan);

            for slot in &plan.windows {
                spawn_window(building, kit, plan, slot);
            }

            if let (Some(ad), Some(banners)) = (plan.advertisement, banner_meshes) {
                banners.spawn(building, kit, plan, ad);
            }

            if let Some((height, mesh)) = antenna_mesh {
                building.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(kit.antenna.clone()),
                    Transform::from_xyz(0.0, plan.height / 2.0 + height / 2.0, 0.0),
                ));
            }
        })
        .id()
}

fn spawn_window(
    building: &mut ChildSpawnerCommands,
    kit: &BuildingKit,
    plan: &BuildingPlan,
    slot: &WindowSlot,
) {
    let rotation = slot.facade.rotation();
    let frame_at = slot.facade.place(
        plan.width,
        plan.depth,
        slot.horizontal,
        slot.vertical,
        WINDOW_STANDOFF,
    );
    let pane_at = slot.facade.place(
        plan.width,
        plan.depth,
        slot.horizontal,
        slot.vertical,
        PANE_STANDOFF,
    );

    building.spawn((
        Mesh3d(kit.window_frame_mesh.clone()),
        MeshMaterial3d(kit.window_frame.clone()),
        Transform::from_translation(frame_at).with_rotation(rotation),
    ));
    building.spawn((
        Mesh3d(kit.pane_mesh.clone()),
        MeshMaterial3d(kit.panes[slot.color_index % kit.panes.len()].clone()),
        Transform::from_translation(pane_at).with_rotation(rotation),
    ));
}

struct DoorMeshes {
    door: Handle<Mesh>,
    lintel: Handle<Mesh>,
    jamb: Handle<Mesh>,
    neon: Handle<Mesh>,
}

impl DoorMeshes {
    fn new(meshes: &mut Assets<Mesh>, plan: &BuildingPlan) -> Self {
        let base = plan.base_y();
        let top = base + plan.door_height;
        let side = plan.door_width * 0.55;
        let z = plan.depth / 2.0 + NEON_STANDOFF;

        Self {
            door: meshes.add(Rectangle::new(plan.door_width, plan.door_height)),
            lintel: meshes.add(Cuboid::new(
                plan.door_width * 1.1,
                FRAME_BAR_WIDTH,
                FRAME_BAR_THICKNESS,
            )),
            jamb: meshes.add(Cuboid::new(
                FRAME_BAR_WIDTH,
                plan.door_height,
                FRAME_BAR_THICKNESS,
            )),
            neon: meshes.add(line_segments(&[
                [Vec3::new(-side, top, z), Vec3::new(side, top, z)],
                [Vec3::new(-side, base, z), Vec3::new(-side, top, z)],
                [Vec3::new(side, base, z), Vec3::new(side, top, z)],
            ])),
        }
    }

    fn spawn(self, building: &mut ChildSpawnerCommands, kit: &BuildingKit, plan: &BuildingPlan) {
        let base = plan.base_y();
        let front = plan.depth / 2.0;
        let door_mid = base + plan.door_height / 2.0;

        building.spawn((
            Mesh3d(self.door),
            MeshMaterial3d(kit.door.clone()),
            Transform::from_xyz(0.0, door_mid, front + DOOR_STANDOFF),
        ));
        building.spawn((
            Mesh3d(self.lintel),
            MeshMaterial3d(kit.door_frame.clone()),
            Transform::from_xyz(0.0, base + plan.door_height, front + FRAME_STANDOFF),
        ));
        for side in [-1.0, 1.0] {
            building.spawn((
                Mesh3d(self.jamb.clone()),
                MeshMaterial3d(kit.door_frame.clone()),
                Transform::from_xyz(
                    side * plan.door_width * 0.55,
                    door_mid,
                    front + FRAME_STANDOFF,
                ),
            ));
        }
        building.spawn((Mesh3d(self.neon), MeshMaterial3d(kit.door_neon.clone())));
    }
}

/// Text strip over image panel, one pair per span (front/back and sides).
struct BannerMeshes {
    text: [Handle<Mesh>; 2],
    image: [Handle<Mesh>; 2],
}

impl BannerMeshes {
    fn new(meshes: &mut Assets<Mesh>, plan: &BuildingPlan, ad: AdPlan) -> Self {
        let text_height = ad.banner_height * TEXT_STRIP_SHARE;
        let image_height = ad.banner_height - text_height;
        let spans = [plan.width * 0.9, plan.depth * 0.9];
        Self {
            text: spans.map(|w| meshes.add(Rectangle::new(w, text_height))),
            image: spans.map(|w| meshes.add(Rectangle::new(w, image_height))),
        }
    }

    fn spawn(
        self,
        building: &mut ChildSpawnerCommands,
        kit: &BuildingKit,
        plan: &BuildingPlan,
        ad: AdPlan,
    ) {
        let text_height = ad.banner_height * TEXT_STRIP_SHARE;
        let image_height = ad.banner_height - text_height;
        let top = ad.center_y + ad.banner_height / 2.0;
        let text_y = top - text_height / 2.0;
        let image_y = top - text_height - image_height / 2.0;

        for facade in Facade::ALL {
            let span = match facade {
                Facade::Front | Facade::Back => 0,
                Facade::Right | Facade::Left => 1,
            };
            let rotation = facade.rotation();
            let text_at = facade.place(plan.width, plan.depth, 0.0, text_y, BANNER_STANDOFF);
            let image_at = facade.place(plan.width, plan.depth, 0.0, image_y, BANNER_STANDOFF);

            building.spawn((
                AdvertisementBand,
                Mesh3d(self.text[span].clone()),
                MeshMaterial3d(kit.ads.text.clone()),
                Transform::from_translation(text_at).with_rotation(rotation),
            ));
            building.spawn((
                AdvertisementBand,
                Mesh3d(self.image[span].clone()),
                MeshMaterial3d(kit.ads.image.clone()),
                Transform::from_translation(image_at).with_rotation(rotation),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::random::CityRng;
    use crate::engine::scene::building_plan::plan_building;

    fn assets() -> (Assets<Mesh>, Assets<StandardMaterial>) {
        (Assets::default(), Assets::default())
    }

    #[test]
    fn building_root_carries_footprint_and_children() {
        let mut world = World::new();
        let (mut meshes, mut materials) = assets();
        let ads = AdMaterials {
            text: materials.add(StandardMaterial::default()),
            image: materials.add(StandardMaterial::default()),
        };
        let kit = BuildingKit::new(&mut meshes, &mut materials, None, ads);

        let mut rng = CityRng::from_seed(5);
        let plan = plan_building(12.0, -8.0, &mut rng.0);

        let root = {
            let mut commands = world.commands();
            spawn_building(&mut commands, &mut meshes, &mut materials, &kit, &plan)
        };
        world.flush();

        let building = world.get::<Building>(root).unwrap();
        assert_eq!(building.footprint, plan.footprint());
        let transform = world.get::<Transform>(root).unwrap();
        assert_eq!(transform.translation, plan.center());

        // body, edges, door, lintel, two jambs, neon
        let mut expected = 7 + plan.windows.len() * 2;
        if plan.advertisement.is_some() {
            expected += 8;
        }
        if plan.antenna_height.is_some() {
            expected += 1;
        }
        let children = world.get::<Children>(root).unwrap();
        assert_eq!(children.len(), expected);
    }

    #[test]
    fn banners_are_tagged_on_all_four_faces() {
        let mut world = World::new();
        let (mut meshes, mut materials) = assets();
        let ads = AdMaterials {
            text: materials.add(StandardMaterial::default()),
            image: materials.add(StandardMaterial::default()),
        };
        let kit = BuildingKit::new(&mut meshes, &mut materials, None, ads);

        let mut rng = CityRng::from_seed(9);
        let plan = (0..200)
            .map(|_| plan_building(0.0, 0.0, &mut rng.0))
            .find(|p| p.advertisement.is_some())
            .unwrap();

        {
            let mut commands = world.commands();
            spawn_building(&mut commands, &mut meshes, &mut materials, &kit, &plan);
        }
        world.flush();

        let mut bands = world.query_filtered::<Entity, With<AdvertisementBand>>();
        assert_eq!(bands.iter(&world).count(), 8);
    }
}
