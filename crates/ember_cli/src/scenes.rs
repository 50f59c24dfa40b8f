//! The built-in scene gallery.
//!
//! Each builder assembles an immutable world and a configured camera; all
//! scene-internal randomness comes from a generator seeded with the CLI seed,
//! so a given (scene, seed) pair always produces the same geometry.

use std::sync::Arc;

use anyhow::Context;
use ember_core::{ImageData, Perlin};
use ember_renderer::{
    make_box, random_color, random_color_range, random_f32, random_range, BvhNode, Camera,
    CheckerTexture, Color, ConstantMedium, Dielectric, DiffuseLight, Hittable, HittableList,
    ImageTexture, Lambertian, Metal, NoiseTexture, Quad, RotateY, Sphere, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Path of the earth texture used by `earth` and `final_scene`.
const EARTH_TEXTURE: &str = "textures/earthmap.jpg";

pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub camera: Camera,
}

pub const SCENE_NAMES: &[&str] = &[
    "bouncing_spheres",
    "checkered_spheres",
    "earth",
    "perlin_spheres",
    "quads",
    "simple_light",
    "cornell_box",
    "cornell_smoke",
    "final_scene",
];

pub fn build(name: &str, seed: u64) -> anyhow::Result<Scene> {
    match name {
        "bouncing_spheres" => Ok(bouncing_spheres(seed)),
        "checkered_spheres" => Ok(checkered_spheres()),
        "earth" => earth(),
        "perlin_spheres" => Ok(perlin_spheres(seed)),
        "quads" => Ok(quads()),
        "simple_light" => Ok(simple_light(seed)),
        "cornell_box" => Ok(cornell_box()),
        "cornell_smoke" => Ok(cornell_smoke()),
        "final_scene" => final_scene(seed),
        other => anyhow::bail!("unknown scene '{other}', try --list"),
    }
}

/// A wide-angle camera shared by the sphere-field scenes.
fn distant_camera(lookfrom: Vec3, lookat: Vec3) -> Camera {
    let mut camera = Camera::new();
    camera.aspect_ratio = 16.0 / 9.0;
    camera.vfov = 20.0;
    camera.lookfrom = lookfrom;
    camera.lookat = lookat;
    camera.vup = Vec3::Y;
    camera.background = Color::new(0.70, 0.80, 1.00);
    camera
}

fn bouncing_spheres(seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = HittableList::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random_f32(&mut rng);
            let center = Vec3::new(
                a as f32 + 0.9 * random_f32(&mut rng),
                0.2,
                b as f32 + 0.9 * random_f32(&mut rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse spheres bounce: the second centre is a short hop up.
                let albedo = random_color(&mut rng) * random_color(&mut rng);
                let center2 = center + Vec3::new(0.0, random_range(&mut rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(Sphere::new_moving(
                    center,
                    center2,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else if choose_mat < 0.9 {
                let albedo = random_color_range(&mut rng, 0.5, 1.0);
                let fuzz = random_range(&mut rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                world.add(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Dielectric::new(1.5)),
                )));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.6, 0.6, 0.6), 0.05)),
    )));

    let lookfrom = Vec3::new(13.0, 3.0, 3.0);
    let lookat = Vec3::new(0.0, 1.0, 0.0);

    // A green mirror just behind the camera, so the camera position shows up
    // in reflections.
    world.add(Arc::new(Sphere::new(
        lookfrom + (lookfrom - lookat) * 0.5,
        0.25,
        Arc::new(Metal::new(Color::new(0.0, 1.0, 0.0), 0.0)),
    )));

    let mut camera = distant_camera(lookfrom, lookat);
    camera.image_width = 1920;
    camera.samples_per_pixel = 50;
    camera.max_depth = 50;
    camera.defocus_angle = 0.6;
    camera.focus_dist = 10.0;

    Scene {
        world: Arc::new(BvhNode::from_list(world)),
        camera,
    }
}

fn checkered_spheres() -> Scene {
    let mut world = HittableList::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    for y in [-10.0, 10.0] {
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, y, 0.0),
            10.0,
            Arc::new(Lambertian::from_texture(checker.clone())),
        )));
    }

    let mut camera = distant_camera(Vec3::new(13.0, 3.0, 3.0), Vec3::new(0.0, 1.0, 0.0));
    camera.image_width = 400;
    camera.samples_per_pixel = 100;
    camera.max_depth = 50;

    Scene {
        world: Arc::new(world),
        camera,
    }
}

fn earth() -> anyhow::Result<Scene> {
    let image = ImageData::load(EARTH_TEXTURE)
        .with_context(|| format!("the earth scene needs {EARTH_TEXTURE}"))?;
    let surface = Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::new(
        Arc::new(image),
    ))));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::ZERO, 2.0, surface)));

    let mut camera = distant_camera(Vec3::new(13.0, 3.0, 3.0), Vec3::ZERO);
    camera.image_width = 960;
    camera.samples_per_pixel = 100;
    camera.max_depth = 50;

    Ok(Scene {
        world: Arc::new(world),
        camera,
    })
}

fn perlin_spheres(seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(
        Perlin::new(&mut rng),
        4.0,
    ))));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        noise.clone(),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, noise)));

    let mut camera = distant_camera(Vec3::new(13.0, 3.0, 3.0), Vec3::new(0.0, 1.0, 0.0));
    camera.image_width = 1920;
    camera.samples_per_pixel = 500;
    camera.max_depth = 500;

    Scene {
        world: Arc::new(world),
        camera,
    }
}

fn quads() -> Scene {
    let mut world = HittableList::new();

    let left_red = Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2)));
    let back_green = Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2)));
    let right_blue = Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0)));
    let upper_orange = Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0)));
    let lower_teal = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8)));

    world.add(Arc::new(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let mut camera = Camera::new();
    camera.aspect_ratio = 1.0;
    camera.image_width = 1920;
    camera.samples_per_pixel = 250;
    camera.max_depth = 100;
    camera.background = Color::new(0.70, 0.80, 1.00);
    camera.vfov = 80.0;
    camera.lookfrom = Vec3::new(0.0, 0.0, 9.0);
    camera.lookat = Vec3::ZERO;
    camera.vup = Vec3::Y;

    Scene {
        world: Arc::new(world),
        camera,
    }
}

fn simple_light(seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(
        Perlin::new(&mut rng),
        4.0,
    ))));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        noise.clone(),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, noise)));

    let difflight = Arc::new(DiffuseLight::new(Color::new(4.0, 4.0, 4.0)));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        difflight,
    )));

    let mut camera = Camera::new();
    camera.aspect_ratio = 16.0 / 9.0;
    camera.image_width = 1920;
    camera.samples_per_pixel = 250;
    camera.max_depth = 125;
    camera.background = Color::ZERO;
    camera.vfov = 20.0;
    camera.lookfrom = Vec3::new(26.0, 3.0, 6.0);
    camera.lookat = Vec3::new(0.0, 2.0, 0.0);
    camera.vup = Vec3::Y;

    Scene {
        world: Arc::new(world),
        camera,
    }
}

/// The five Cornell walls and the light, shared by both Cornell scenes.
fn cornell_walls(world: &mut HittableList, light: Arc<DiffuseLight>, light_q: Vec3, light_u: Vec3, light_v: Vec3) {
    let red = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));

    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(light_q, light_u, light_v, light)));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white,
    )));
}

/// The two rotated boxes standing in the Cornell room.
fn cornell_boxes() -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let white = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));

    let box1: Arc<dyn Hittable> = Arc::new(Translate::new(
        Arc::new(RotateY::new(
            Arc::new(make_box(
                Vec3::ZERO,
                Vec3::new(165.0, 330.0, 165.0),
                white.clone(),
            )),
            15.0,
        )),
        Vec3::new(265.0, 0.0, 295.0),
    ));

    let box2: Arc<dyn Hittable> = Arc::new(Translate::new(
        Arc::new(RotateY::new(
            Arc::new(make_box(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white)),
            -18.0,
        )),
        Vec3::new(130.0, 0.0, 65.0),
    ));

    (box1, box2)
}

fn cornell_camera() -> Camera {
    let mut camera = Camera::new();
    camera.aspect_ratio = 1.0;
    camera.background = Color::ZERO;
    camera.vfov = 40.0;
    camera.lookfrom = Vec3::new(278.0, 278.0, -800.0);
    camera.lookat = Vec3::new(278.0, 278.0, 0.0);
    camera.vup = Vec3::Y;
    camera
}

fn cornell_box() -> Scene {
    let mut world = HittableList::new();
    cornell_walls(
        &mut world,
        Arc::new(DiffuseLight::new(Color::new(15.0, 15.0, 15.0))),
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
    );

    let (box1, box2) = cornell_boxes();
    world.add(box1);
    world.add(box2);

    let mut camera = cornell_camera();
    camera.image_width = 1920;
    camera.samples_per_pixel = 400;
    camera.max_depth = 200;

    Scene {
        world: Arc::new(world),
        camera,
    }
}

fn cornell_smoke() -> Scene {
    let mut world = HittableList::new();
    cornell_walls(
        &mut world,
        Arc::new(DiffuseLight::new(Color::new(7.0, 7.0, 7.0))),
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
    );

    let (box1, box2) = cornell_boxes();
    world.add(Arc::new(ConstantMedium::new(box1, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::new(box2, 0.01, Color::ONE)));

    let mut camera = cornell_camera();
    camera.image_width = 3840;
    camera.samples_per_pixel = 400;
    camera.max_depth = 400;

    Scene {
        world: Arc::new(world),
        camera,
    }
}

fn final_scene(seed: u64) -> anyhow::Result<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);

    // Ground: a 20x20 field of boxes with random heights.
    let ground = Arc::new(Lambertian::new(Color::new(0.48, 0.83, 0.53)));
    let mut boxes1 = HittableList::new();
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let x1 = x0 + w;
            let y1 = random_range(&mut rng, 1.0, 101.0);
            let z1 = z0 + w;

            boxes1.add(Arc::new(make_box(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x1, y1, z1),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(Arc::new(BvhNode::from_list(boxes1)));

    world.add(Arc::new(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        Arc::new(DiffuseLight::new(Color::new(7.0, 7.0, 7.0))),
    )));

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    world.add(Arc::new(Sphere::new_moving(
        center1,
        center1 + Vec3::new(30.0, 0.0, 0.0),
        50.0,
        Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.1))),
    )));

    world.add(Arc::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // A glass sphere filled with a blue medium (cheap subsurface look): the
    // boundary is in the scene twice, once as glass and once as the volume.
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::new(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    )));

    // Thin global mist.
    let mist_boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::ZERO,
        5000.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::new(ConstantMedium::new(
        mist_boundary,
        0.0001,
        Color::ONE,
    )));

    let earth_image = ImageData::load(EARTH_TEXTURE)
        .with_context(|| format!("the final scene needs {EARTH_TEXTURE}"))?;
    world.add(Arc::new(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::new(
            Arc::new(earth_image),
        )))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(
            Perlin::new(&mut rng),
            0.2,
        )))),
    )));

    // A cube of 1000 small spheres, rotated and pushed into the corner.
    let white = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let mut boxes2 = HittableList::new();
    for _ in 0..1000 {
        let center = Vec3::new(
            random_range(&mut rng, 0.0, 165.0),
            random_range(&mut rng, 0.0, 165.0),
            random_range(&mut rng, 0.0, 165.0),
        );
        boxes2.add(Arc::new(Sphere::new(center, 10.0, white.clone())));
    }
    world.add(Arc::new(Translate::new(
        Arc::new(RotateY::new(Arc::new(BvhNode::from_list(boxes2)), 15.0)),
        Vec3::new(-100.0, 270.0, 395.0),
    )));

    let mut camera = Camera::new();
    camera.aspect_ratio = 1.0;
    camera.image_width = 1920;
    camera.samples_per_pixel = 1000;
    camera.max_depth = 100;
    camera.background = Color::ZERO;
    camera.vfov = 40.0;
    camera.lookfrom = Vec3::new(478.0, 278.0, -600.0);
    camera.lookat = Vec3::new(278.0, 278.0, 0.0);
    camera.vup = Vec3::Y;

    Ok(Scene {
        world: Arc::new(world),
        camera,
    })
}
