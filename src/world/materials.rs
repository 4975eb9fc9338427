//! Material definitions and registry for level geometry.

use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use std::collections::HashMap;

use crate::core::RopeType;

/// Width and height of the generated volume stripe texture.
const STRIPE_SIZE: u32 = 16;

/// Material registry mapping material names to handles.
pub struct MaterialRegistry {
    materials: HashMap<String, Handle<StandardMaterial>>,
    fallback: Handle<StandardMaterial>,
    pub crate_material: Handle<StandardMaterial>,
    /// Semi-transparent stripes shared by every volume texture
    pub stripes: Handle<Image>,
}

impl MaterialRegistry {
    pub fn new(materials: &mut Assets<StandardMaterial>, images: &mut Assets<Image>) -> Self {
        let mut registry = HashMap::new();

        // Concrete (default) - light grey, rough
        let fallback = materials.add(StandardMaterial {
            base_color: Color::srgb(0.62, 0.62, 0.6),
            perceptual_roughness: 0.95,
            ..default()
        });
        registry.insert("concrete".to_string(), fallback.clone());

        // Dark concrete for accents and pillars
        registry.insert(
            "dark_concrete".to_string(),
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.3, 0.3, 0.32),
                perceptual_roughness: 0.9,
                ..default()
            }),
        );

        registry.insert(
            "wood".to_string(),
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.45, 0.33, 0.22),
                perceptual_roughness: 0.7,
                ..default()
            }),
        );

        registry.insert(
            "metal".to_string(),
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.42, 0.44, 0.48),
                perceptual_roughness: 0.3,
                metallic: 0.8,
                ..default()
            }),
        );

        let crate_material = materials.add(StandardMaterial {
            base_color: Color::srgb(0.7, 0.5, 0.25),
            perceptual_roughness: 0.8,
            ..default()
        });

        Self {
            materials: registry,
            fallback,
            crate_material,
            stripes: images.add(stripe_image()),
        }
    }

    /// Get material by name, falling back to concrete.
    pub fn get(&self, material_name: &str) -> Handle<StandardMaterial> {
        self.materials
            .get(material_name)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// A fresh material for a volume so its texture can scroll on its own.
    pub fn volume_material(&self, materials: &mut Assets<StandardMaterial>, emissive: LinearRgba) -> Handle<StandardMaterial> {
        materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
            base_color_texture: Some(self.stripes.clone()),
            emissive,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            ..default()
        })
    }
}

/// Glow of an emancipation volume for the ropes it cuts.
pub fn emancipation_color(rope_type: RopeType) -> LinearRgba {
    match rope_type {
        RopeType::Both => LinearRgba::rgb(1.0, 0.0, 1.0),
        RopeType::Left => LinearRgba::rgb(0.0, 0.0, 1.0),
        RopeType::Right => LinearRgba::rgb(1.0, 0.0, 0.0),
    }
}

/// Diagonal white stripes on transparent, tiling in both directions.
fn stripe_image() -> Image {
    let mut data = Vec::with_capacity((STRIPE_SIZE * STRIPE_SIZE * 4) as usize);
    for y in 0..STRIPE_SIZE {
        for x in 0..STRIPE_SIZE {
            let alpha = if (x + y) % 8 < 3 { 255 } else { 60 };
            data.extend_from_slice(&[255, 255, 255, alpha]);
        }
    }

    let mut image = Image::new(
        Extent3d {
            width: STRIPE_SIZE,
            height: STRIPE_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}
