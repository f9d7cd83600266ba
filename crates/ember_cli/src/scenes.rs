//! Built-in scenes and the camera setups that go with them.

use std::path::Path;
use std::sync::Arc;

use ember_core::{load_obj, RenderSettings};
use ember_math::{Color, Vec3};
use ember_renderer::sampling::{gen_f32, gen_range, random_vec3};
use ember_renderer::{
    BvhNode, ConstantMedium, Cube, HittableList, Material, MovingSphere, Object, Rect, Rotate,
    SceneError, SceneResult, Sphere, Texture, Translate, TriangleMesh,
};
use rand::RngCore;

/// Names accepted by [`build`].
pub const SCENES: &[&str] = &["random", "light", "cornell", "cornell-fog", "mesh", "blocks"];

/// Build the scene called `name`.
///
/// The shutter interval comes from `settings`; `mesh` is only read by the
/// `mesh` scene.
pub fn build(
    name: &str,
    settings: &RenderSettings,
    mesh: Option<&Path>,
    rng: &mut dyn RngCore,
) -> SceneResult<HittableList> {
    let (t0, t1) = (settings.shutter_open, settings.shutter_close);
    match name {
        "random" => random_spheres(t0, t1, rng),
        "light" => light_scene(t0, t1, rng),
        "cornell" => Ok(cornell_box(false)),
        "cornell-fog" => Ok(cornell_box(true)),
        "mesh" => {
            let path = mesh.ok_or_else(|| SceneError::MissingInput {
                scene: name.to_string(),
                what: "an OBJ file (--mesh)".to_string(),
            })?;
            mesh_scene(path, t0, t1, rng)
        }
        "blocks" => blocks(t0, t1, rng),
        _ => Err(SceneError::UnknownScene(name.to_string())),
    }
}

/// Point the camera the way `name` expects to be viewed.
///
/// Unknown names leave the settings alone.
pub fn apply_preset(name: &str, settings: &mut RenderSettings) {
    match name {
        "random" => {
            let defaults = RenderSettings::default();
            settings.look_from = defaults.look_from;
            settings.look_at = defaults.look_at;
            settings.vfov = defaults.vfov;
            settings.aperture = defaults.aperture;
            settings.focus_dist = defaults.focus_dist;
            settings.background = defaults.background;
        }
        "light" => {
            settings.look_from = Vec3::new(26.0, 3.0, 6.0);
            settings.look_at = Vec3::new(0.0, 2.0, 0.0);
            settings.vfov = 20.0;
            settings.aperture = 0.0;
            settings.focus_dist = 10.0;
            settings.background = Color::ZERO;
        }
        "cornell" | "cornell-fog" | "blocks" => {
            settings.look_from = Vec3::new(2.78, 2.78, -8.0);
            settings.look_at = Vec3::new(2.78, 2.78, 0.0);
            settings.vfov = 40.0;
            settings.aperture = 0.0;
            settings.focus_dist = 10.0;
            settings.aspect = 1.0;
            settings.background = Color::ZERO;
        }
        "mesh" => {
            settings.look_from = Vec3::new(0.0, 2.0, 8.0);
            settings.look_at = Vec3::new(0.0, 1.0, 0.0);
            settings.vfov = 40.0;
            settings.aperture = 0.0;
            settings.focus_dist = 8.0;
            settings.background = Color::splat(0.05);
        }
        _ => {}
    }
    settings.vup = Vec3::Y;
}

fn checker_ground() -> Sphere {
    let checker = Arc::new(Texture::checker(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::diffuse_textured(checker)),
    )
}

fn into_bvh(
    list: &HittableList,
    t0: f32,
    t1: f32,
    rng: &mut dyn RngCore,
) -> SceneResult<HittableList> {
    let mut world = HittableList::new();
    world.add(BvhNode::from_list(list, t0, t1, rng)?);
    Ok(world)
}

fn random_spheres(t0: f32, t1: f32, rng: &mut dyn RngCore) -> SceneResult<HittableList> {
    let mut list = HittableList::new();
    list.add(checker_ground());

    let avoid = Vec3::new(4.0, 0.2, 0.0);
    for i in -11..11 {
        for j in -11..11 {
            let choose = gen_f32(rng);
            let center = Vec3::new(
                i as f32 + 0.9 * gen_f32(rng),
                0.2,
                j as f32 + 0.9 * gen_f32(rng),
            );
            if (center - avoid).length() <= 0.9 {
                continue;
            }

            if choose < 0.8 {
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let end = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                list.add(MovingSphere::new(
                    center,
                    end,
                    0.0,
                    1.0,
                    0.2,
                    Arc::new(Material::diffuse(albedo)),
                ));
            } else if choose < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                list.add(Sphere::new(center, 0.2, Arc::new(Material::metal(albedo, fuzz))));
            } else {
                list.add(Sphere::new(center, 0.2, Arc::new(Material::glass(1.5))));
            }
        }
    }

    list.add(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::glass(1.5)),
    ));
    list.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::diffuse(Color::new(0.4, 0.2, 0.1))),
    ));
    list.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    into_bvh(&list, t0, t1, rng)
}

fn light_scene(t0: f32, t1: f32, rng: &mut dyn RngCore) -> SceneResult<HittableList> {
    let light = Arc::new(Material::light(Color::splat(4.0)));

    let mut list = HittableList::new();
    list.add(checker_ground());
    list.add(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::glass(1.5)),
    ));
    list.add(Sphere::new(
        Vec3::new(0.0, 1.0, 2.0),
        1.0,
        Arc::new(Material::diffuse(Color::splat(0.5))),
    ));
    list.add(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light.clone()));
    list.add(Rect::xy((-3.0, 3.0), (1.0, 3.0), -3.0, light));

    into_bvh(&list, t0, t1, rng)
}

const BOX: f32 = 5.55;

fn cornell_walls() -> HittableList {
    let red = Arc::new(Material::diffuse(Color::new(0.65, 0.05, 0.05)));
    let white = Arc::new(Material::diffuse(Color::splat(0.73)));
    let green = Arc::new(Material::diffuse(Color::new(0.12, 0.45, 0.15)));
    let light = Arc::new(Material::light(Color::splat(15.0)));

    let mut walls = HittableList::new();
    walls.add(Rect::yz((0.0, BOX), (0.0, BOX), BOX, red));
    walls.add(Rect::yz((0.0, BOX), (0.0, BOX), 0.0, green));
    walls.add(Rect::xz((2.13, 3.43), (2.27, 3.32), 5.54, light));
    walls.add(Rect::xz((0.0, BOX), (0.0, BOX), 0.0, white.clone()));
    walls.add(Rect::xz((0.0, BOX), (0.0, BOX), BOX, white.clone()));
    walls.add(Rect::xy((0.0, BOX), (0.0, BOX), BOX, white));
    walls
}

/// Cornell box with a tall and a short block, solid or as fog.
fn cornell_box(fog: bool) -> HittableList {
    let white = Arc::new(Material::diffuse(Color::splat(0.73)));

    let tall = Cube::new(Vec3::ZERO, Vec3::new(1.65, 3.30, 1.65), white.clone());
    let tall = Translate::new(Rotate::y(tall, 15.0), Vec3::new(2.65, 0.0, 2.95));

    let short = Cube::new(Vec3::ZERO, Vec3::splat(1.65), white);
    let short = Translate::new(Rotate::y(short, -18.0), Vec3::new(1.30, 0.0, 0.65));

    let mut world = cornell_walls();
    if fog {
        world.add(ConstantMedium::new(tall, 1.0, Color::ONE));
        world.add(ConstantMedium::new(short, 1.0, Color::new(1.0, 0.0, 1.0)));
    } else {
        world.add(tall);
        world.add(short);
    }
    world
}

fn mesh_scene(
    path: &Path,
    t0: f32,
    t1: f32,
    rng: &mut dyn RngCore,
) -> SceneResult<HittableList> {
    let mesh = load_obj(path)?;
    let red = Arc::new(Material::diffuse(Color::new(0.65, 0.05, 0.05)));
    let triangles = TriangleMesh::new(&mesh, red)?.into_triangles();
    log::info!(
        "Loaded {} triangles from {}",
        triangles.len(),
        path.display()
    );

    let faces: Vec<Arc<Object>> = triangles
        .into_iter()
        .map(|tri| Arc::new(Object::from(tri)))
        .collect();

    let mut world = HittableList::new();
    world.add(checker_ground());
    world.add(Rect::xz(
        (-343.0, 343.0),
        (-332.0, 332.0),
        548.7,
        Arc::new(Material::light(Color::splat(2.0))),
    ));
    world.add(BvhNode::new(&faces, t0, t1, rng)?);
    Ok(world)
}

fn blocks(t0: f32, t1: f32, rng: &mut dyn RngCore) -> SceneResult<HittableList> {
    let ground = Arc::new(Material::diffuse(Color::new(0.45, 0.36, 0.83)));

    let mut floor = HittableList::new();
    for i in 0..20 {
        for j in 0..20 {
            let x0 = -10.0 + i as f32;
            let z0 = -10.0 + j as f32;
            let height = gen_range(rng, 1.0, 101.0);
            floor.add(Cube::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + 1.0, height, z0 + 1.0),
                ground.clone(),
            ));
        }
    }

    let mut world = into_bvh(&floor, t0, t1, rng)?;
    world.add(Rect::xz(
        (1.2, 4.2),
        (1.5, 4.1),
        5.54,
        Arc::new(Material::light(Color::splat(15.0))),
    ));
    Ok(world)
}
