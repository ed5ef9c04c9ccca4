//! Built-in scenes.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use lantern_core::{load_obj, load_texture_image};
use lantern_renderer::{
    AxisRect, BoxShape, Bvh, Camera, CheckerTexture, Color, ConstantMedium, Dielectric,
    DiffuseLight, HittableList, ImageTexture, Lambertian, Material, Metal, MovingSphere,
    NoiseTexture, Primitive, Sphere, Texture, TriangleMesh, Vec3,
};
use rand::{Rng, RngCore};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneName {
    /// Cornell box with two rotated boxes
    Cornell,
    /// Cornell box with the boxes filled with smoke
    CornellSmoke,
    /// Field of small moving, metal and glass spheres
    RandomSpheres,
    /// Two checkered spheres
    TwoSpheres,
    /// Perlin noise ground lit by a rectangle and a sphere
    Perlin,
    /// OBJ mesh inside the Cornell box
    Mesh,
}

/// Inputs some scenes need besides the random source.
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions<'a> {
    pub aspect_ratio: f32,
    pub mesh: Option<&'a Path>,
    pub texture: Option<&'a Path>,
}

pub struct Scene {
    pub world: Primitive,
    pub camera: Camera,
}

pub fn build(name: SceneName, options: &SceneOptions, rng: &mut dyn RngCore) -> Result<Scene> {
    let scene = match name {
        SceneName::Cornell => cornell_box(options),
        SceneName::CornellSmoke => cornell_smoke(options)?,
        SceneName::RandomSpheres => random_spheres(options, rng)?,
        SceneName::TwoSpheres => two_spheres(options),
        SceneName::Perlin => perlin_spheres(options, rng)?,
        SceneName::Mesh => cornell_mesh(options)?,
    };
    Ok(scene)
}

fn lambertian(color: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(color))
}

fn light(intensity: f32) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::new(Color::splat(intensity)))
}

fn camera(
    options: &SceneOptions,
    look_from: Vec3,
    look_at: Vec3,
    vfov: f32,
    aperture: f32,
    focus_dist: f32,
) -> Camera {
    let mut camera = Camera::new()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, aperture, focus_dist)
        .with_aspect_ratio(options.aspect_ratio)
        .with_shutter(0.0, 1.0);
    camera.initialize();
    camera
}

fn cornell_camera(options: &SceneOptions) -> Camera {
    camera(
        options,
        Vec3::new(278.0, 278.0, -800.0),
        Vec3::new(278.0, 278.0, 0.0),
        40.0,
        0.0,
        10.0,
    )
}

/// The five walls of the Cornell box plus `ceiling_light`.
fn cornell_walls(ceiling_light: AxisRect) -> HittableList {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    let mut world = HittableList::new();
    world.add(Primitive::from(AxisRect::yz((0.0, 555.0), (0.0, 555.0), 555.0, green)).flipped());
    world.add(AxisRect::yz((0.0, 555.0), (0.0, 555.0), 0.0, red));
    world.add(ceiling_light);
    world.add(Primitive::from(AxisRect::xz((0.0, 555.0), (0.0, 555.0), 555.0, white.clone())).flipped());
    world.add(AxisRect::xz((0.0, 555.0), (0.0, 555.0), 0.0, white.clone()));
    world.add(Primitive::from(AxisRect::xy((0.0, 555.0), (0.0, 555.0), 555.0, white)).flipped());
    world
}

/// The short and the tall box, rotated and placed on the floor.
fn cornell_boxes(material: Arc<dyn Material>) -> [Primitive; 2] {
    let short = Primitive::from(BoxShape::new(Vec3::ZERO, Vec3::splat(165.0), material.clone()))
        .rotated(Vec3::new(0.0, -18.0, 0.0))
        .translated(Vec3::new(130.0, 0.0, 65.0));
    let tall = Primitive::from(BoxShape::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), material))
        .rotated(Vec3::new(0.0, 15.0, 0.0))
        .translated(Vec3::new(265.0, 0.0, 295.0));
    [short, tall]
}

fn cornell_box(options: &SceneOptions) -> Scene {
    let mut world = cornell_walls(AxisRect::xz((213.0, 343.0), (227.0, 332.0), 554.0, light(15.0)));
    for item in cornell_boxes(lambertian(Color::splat(0.73))) {
        world.add(item);
    }

    Scene {
        world: world.into(),
        camera: cornell_camera(options),
    }
}

fn cornell_smoke(options: &SceneOptions) -> Result<Scene> {
    let mut world = cornell_walls(AxisRect::xz((113.0, 443.0), (127.0, 432.0), 554.0, light(7.0)));
    let [short, tall] = cornell_boxes(lambertian(Color::splat(0.73)));
    world.add(ConstantMedium::new(short, 0.01, Color::ONE)?);
    world.add(ConstantMedium::new(tall, 0.01, Color::ZERO)?);

    Ok(Scene {
        world: world.into(),
        camera: cornell_camera(options),
    })
}

fn cornell_mesh(options: &SceneOptions) -> Result<Scene> {
    let path = options
        .mesh
        .context("The mesh scene needs an OBJ file (--mesh)")?;
    let mesh = load_obj(path).with_context(|| format!("Failed to load mesh {}", path.display()))?;

    // Stand the mesh on the floor in the middle of the box
    let bounds = mesh.bounds;
    let offset = Vec3::new(278.0, 0.0, 278.0)
        - Vec3::new(bounds.centroid().x, bounds.min().y, bounds.centroid().z);
    let extent = bounds.max() - bounds.min();
    if extent.max_element() > 555.0 {
        log::warn!("Mesh extent {} does not fit inside the box", extent);
    }

    let mut world = cornell_walls(AxisRect::xz((213.0, 343.0), (227.0, 332.0), 554.0, light(15.0)));
    let triangles = TriangleMesh::new(Arc::new(mesh), lambertian(Color::new(0.8, 0.6, 0.2)));
    world.add(Primitive::from(triangles).translated(offset));

    Ok(Scene {
        world: world.into(),
        camera: cornell_camera(options),
    })
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

fn random_spheres(options: &SceneOptions, rng: &mut dyn RngCore) -> Result<Scene> {
    let mut objects: Vec<Primitive> = vec![Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(checker())),
    )
    .into()];

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.7 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.7 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere: Primitive = if choose_mat < 0.8 {
                let lift = Vec3::new(0.0, 0.2 * rng.gen::<f32>(), 0.0);
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                MovingSphere::new(center, center + lift, 0.0, 1.0, 0.2, lambertian(albedo)).into()
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                );
                let fuzz = 0.5 * rng.gen::<f32>();
                Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))).into()
            } else {
                Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))).into()
            };
            objects.push(sphere);
        }
    }

    objects.push(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5))).into());
    objects.push(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, lambertian(Color::new(0.4, 0.2, 0.1))).into());
    objects.push(
        Sphere::new(
            Vec3::new(4.0, 1.0, 0.0),
            1.0,
            Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
        )
        .into(),
    );

    let world = Bvh::build(objects, 0.0, 1.0, rng).context("Failed to build scene BVH")?;

    let look_from = Vec3::new(10.0, 1.5, 5.0);
    let look_at = Vec3::new(0.0, 1.0, 0.0);
    let focus_dist = (look_from - look_at).length();
    Ok(Scene {
        world: world.into(),
        camera: camera(options, look_from, look_at, 35.0, 0.05, focus_dist),
    })
}

fn two_spheres(options: &SceneOptions) -> Scene {
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(checker()));
    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material));

    Scene {
        world: world.into(),
        camera: camera(options, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 0.0, 10.0),
    }
}

fn perlin_spheres(options: &SceneOptions, rng: &mut dyn RngCore) -> Result<Scene> {
    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(5.0, rng));

    // Without an image the small sphere reuses the noise texture
    let surface: Arc<dyn Texture> = match options.texture {
        Some(path) => {
            let image = load_texture_image(path)
                .with_context(|| format!("Failed to load texture {}", path.display()))?;
            Arc::new(ImageTexture::new(Arc::new(image)))
        }
        None => noise.clone(),
    };

    let mut world = HittableList::new();
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(noise)),
    ));
    world.add(Sphere::new(
        Vec3::new(0.0, 2.0, 0.0),
        2.0,
        Arc::new(Lambertian::textured(surface)),
    ));
    world.add(AxisRect::xy((3.0, 5.0), (1.0, 3.0), -2.0, light(4.0)));
    world.add(Sphere::new(Vec3::new(-8.0, 8.0, 8.0), 3.0, light(4.0)));

    Ok(Scene {
        world: world.into(),
        camera: camera(options, Vec3::new(13.0, 2.0, 3.0), Vec3::new(0.0, 2.0, 0.0), 40.0, 0.0, 10.0),
    })
}
