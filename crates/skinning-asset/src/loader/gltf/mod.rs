use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    path::Path,
};

use glam::{Mat4, Quat, Vec3};
use gltf::{
    accessor::{DataType, Dimensions},
    animation::{self, Channel, Property, Sampler},
    scene::Transform,
    Accessor, Animation, Document, Gltf, Node, Scene, Skin,
};
use log::{debug, warn};

use crate::{
    animation::{
        AnimationAsset, AnimationChannelAsset, AnimationProperty, AnimationSamplerAsset,
        Interpolation, SamplerOutput,
    },
    loader::{chunk_mat4, chunk_vec3, chunk_vec4},
    model::{ModelAsset, ModelError},
    node::{DecomposedTransform, NodeAsset, NodeTransform},
    scene::SceneAsset,
    skin::SkinAsset,
};

#[derive(Debug)]
pub enum GltfLoaderError {
    Gltf(gltf::Error),
    Model(ModelError),
    /// accessor, end of read, buffer length
    AccessorOutOfBounds(usize, usize, usize),
    MissingBuffer(usize),
    BadAccessorDataType(DataType, DataType),
    BadAccessorDimensions(Dimensions, Dimensions),
    BadNormalizedDataType(DataType),
}

impl Display for GltfLoaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GltfLoaderError::Gltf(error) => Display::fmt(error, f),
            GltfLoaderError::Model(error) => Display::fmt(error, f),
            GltfLoaderError::AccessorOutOfBounds(accessor, end, length) => write!(
                f,
                "Accessor #{} reads up to byte {}, but the buffer has {} bytes",
                accessor, end, length
            ),
            GltfLoaderError::MissingBuffer(index) => write!(f, "Buffer #{} not loaded", index),
            GltfLoaderError::BadAccessorDataType(expected, actual) => write!(
                f,
                "Bad accessor data type: expected {:?}, but got {:?}",
                expected, actual
            ),
            GltfLoaderError::BadAccessorDimensions(expected, actual) => write!(
                f,
                "Bad accessor dimensions: expected {:?}, but got {:?}",
                expected, actual
            ),
            GltfLoaderError::BadNormalizedDataType(data_type) => {
                write!(f, "Data type {:?} can't be normalized", data_type)
            }
        }
    }
}

impl Error for GltfLoaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GltfLoaderError::Gltf(error) => Some(error),
            GltfLoaderError::Model(error) => Some(error),
            _ => None,
        }
    }
}

impl From<gltf::Error> for GltfLoaderError {
    fn from(value: gltf::Error) -> Self {
        Self::Gltf(value)
    }
}

impl From<ModelError> for GltfLoaderError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

type GltfLoadResult<T> = Result<T, GltfLoaderError>;

#[inline]
fn component_size(data_type: DataType) -> usize {
    match data_type {
        DataType::I8 | DataType::U8 => 1,
        DataType::I16 | DataType::U16 => 2,
        DataType::U32 | DataType::F32 => 4,
    }
}

#[inline]
fn component_count(dimensions: Dimensions) -> usize {
    match dimensions {
        Dimensions::Scalar => 1,
        Dimensions::Vec2 => 2,
        Dimensions::Vec3 => 3,
        Dimensions::Vec4 => 4,
        Dimensions::Mat2 => 4,
        Dimensions::Mat3 => 9,
        Dimensions::Mat4 => 16,
    }
}

struct GltfDocumentLoader<'a> {
    document: &'a Document,
    buffers: &'a [gltf::buffer::Data],
}

impl<'a> GltfDocumentLoader<'a> {
    fn new(document: &'a Document, buffers: &'a [gltf::buffer::Data]) -> Self {
        Self { document, buffers }
    }

    #[inline]
    fn check_accessor(
        accessor: &Accessor,
        data_type: DataType,
        dimensions: Dimensions,
    ) -> GltfLoadResult<()> {
        let actual_data_type = accessor.data_type();
        if actual_data_type != data_type {
            return Err(GltfLoaderError::BadAccessorDataType(
                data_type,
                actual_data_type,
            ));
        }

        let actual_dimensions = accessor.dimensions();
        if actual_dimensions != dimensions {
            return Err(GltfLoaderError::BadAccessorDimensions(
                dimensions,
                actual_dimensions,
            ));
        }

        Ok(())
    }

    /// Read the raw bytes of an accessor, with the buffer view stride removed.
    fn load_accessor(&self, accessor: &Accessor) -> GltfLoadResult<Vec<u8>> {
        let item_length =
            component_size(accessor.data_type()) * component_count(accessor.dimensions());
        let count = accessor.count();

        // Accessors without a buffer view are all zeroes
        let Some(view) = accessor.view() else {
            return Ok(vec![0; item_length * count]);
        };
        let buffer_index = view.buffer().index();
        let buffer = self
            .buffers
            .get(buffer_index)
            .ok_or(GltfLoaderError::MissingBuffer(buffer_index))?;

        let offset = accessor.offset() + view.offset();
        let stride = view.stride().unwrap_or(item_length);
        if count == 0 {
            return Ok(Vec::new());
        }
        let end = offset + (count - 1) * stride + item_length;
        if end > buffer.len() {
            return Err(GltfLoaderError::AccessorOutOfBounds(
                accessor.index(),
                end,
                buffer.len(),
            ));
        }

        let mut result = Vec::with_capacity(item_length * count);
        for item in 0..count {
            let start = offset + item * stride;
            result.extend_from_slice(&buffer[start..start + item_length]);
        }
        Ok(result)
    }

    fn load_accessor_f32(&self, accessor: &Accessor) -> GltfLoadResult<Vec<f32>> {
        if accessor.data_type() != DataType::F32 {
            return Err(GltfLoaderError::BadAccessorDataType(
                DataType::F32,
                accessor.data_type(),
            ));
        }
        let data = self.load_accessor(accessor)?;
        Ok(data
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Read an accessor as floats, normalizing integer components the way
    /// GLTF defines for normalized accessors.
    fn load_accessor_normalized(&self, accessor: &Accessor) -> GltfLoadResult<Vec<f32>> {
        let data_type = accessor.data_type();
        if data_type == DataType::F32 {
            return self.load_accessor_f32(accessor);
        }
        let data = self.load_accessor(accessor)?;
        let values = match data_type {
            DataType::I8 => data
                .iter()
                .map(|&byte| (byte as i8 as f32 / i8::MAX as f32).max(-1.0))
                .collect(),
            DataType::U8 => data
                .iter()
                .map(|&byte| byte as f32 / u8::MAX as f32)
                .collect(),
            DataType::I16 => data
                .chunks_exact(2)
                .map(|chunk| {
                    let value = i16::from_le_bytes([chunk[0], chunk[1]]);
                    (value as f32 / i16::MAX as f32).max(-1.0)
                })
                .collect(),
            DataType::U16 => data
                .chunks_exact(2)
                .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]) as f32 / u16::MAX as f32)
                .collect(),
            other => return Err(GltfLoaderError::BadNormalizedDataType(other)),
        };
        Ok(values)
    }

    fn load_node(&self, node: Node) -> NodeAsset {
        let transform = match node.transform() {
            Transform::Matrix { matrix } => NodeTransform::Matrix(Mat4::from_cols_array_2d(&matrix)),
            Transform::Decomposed {
                translation,
                rotation,
                scale,
            } => NodeTransform::Decomposed(DecomposedTransform {
                translation: Vec3::from_array(translation),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from_array(scale),
            }),
        };
        NodeAsset {
            name: node.name().map(str::to_string),
            transform,
            children: node.children().map(|child| child.index()).collect(),
            mesh: node.mesh().map(|mesh| mesh.index()),
            skin: node.skin().map(|skin| skin.index()),
        }
    }

    fn load_skin(&self, skin: Skin) -> GltfLoadResult<SkinAsset> {
        let joints: Vec<usize> = skin.joints().map(|joint| joint.index()).collect();
        let inverse_bind_matrices = match skin.inverse_bind_matrices() {
            Some(accessor) => {
                Self::check_accessor(&accessor, DataType::F32, Dimensions::Mat4)?;
                chunk_mat4(&self.load_accessor_f32(&accessor)?)
            }
            // Without inverse bind matrices, each one is identity
            None => vec![Mat4::IDENTITY; joints.len()],
        };
        Ok(SkinAsset {
            name: skin.name().map(str::to_string),
            joints,
            inverse_bind_matrices,
            skeleton: skin.skeleton().map(|node| node.index()),
        })
    }

    fn load_scene(&self, scene: Scene) -> SceneAsset {
        SceneAsset {
            name: scene.name().map(str::to_string),
            roots: scene.nodes().map(|node| node.index()).collect(),
        }
    }

    fn load_animation_sampler(
        &self,
        index: usize,
        sampler: Sampler,
    ) -> GltfLoadResult<AnimationSamplerAsset> {
        let input = sampler.input();
        Self::check_accessor(&input, DataType::F32, Dimensions::Scalar)?;
        let times = self.load_accessor_f32(&input)?;

        let interpolation = match sampler.interpolation() {
            animation::Interpolation::Linear => Interpolation::Linear,
            animation::Interpolation::Step => Interpolation::Step,
            animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };

        // Cubic spline outputs keep in-tangent, value and out-tangent per keyframe
        let output = sampler.output();
        let output = match output.dimensions() {
            Dimensions::Vec3 => SamplerOutput::Vec3(chunk_vec3(&self.load_accessor_f32(&output)?)),
            Dimensions::Vec4 => {
                SamplerOutput::Vec4(chunk_vec4(&self.load_accessor_normalized(&output)?))
            }
            dimensions => {
                warn!(
                    "Sampler #{} has unsupported output {:?}, it will not animate",
                    index, dimensions
                );
                SamplerOutput::Unsupported {
                    components: component_count(dimensions),
                    count: output.count(),
                }
            }
        };

        Ok(AnimationSamplerAsset {
            times,
            output,
            interpolation,
        })
    }

    fn load_animation_channel(index: usize, channel: Channel) -> Option<AnimationChannelAsset> {
        let target = channel.target();
        let property = match target.property() {
            Property::Translation => AnimationProperty::Translation,
            Property::Rotation => AnimationProperty::Rotation,
            Property::Scale => AnimationProperty::Scale,
            Property::MorphTargetWeights => {
                warn!(
                    "Skipping morph target channel #{} on node #{}",
                    index,
                    target.node().index()
                );
                return None;
            }
        };
        Some(AnimationChannelAsset {
            target: target.node().index(),
            property,
            sampler: channel.sampler().index(),
        })
    }

    fn load_animation(&self, animation: Animation) -> GltfLoadResult<AnimationAsset> {
        let samplers = animation
            .samplers()
            .enumerate()
            .map(|(index, sampler)| self.load_animation_sampler(index, sampler))
            .collect::<Result<_, _>>()?;
        let channels = animation
            .channels()
            .enumerate()
            .filter_map(|(index, channel)| Self::load_animation_channel(index, channel))
            .collect();
        Ok(AnimationAsset {
            name: animation.name().map(str::to_string),
            samplers,
            channels,
        })
    }

    fn load(&self) -> GltfLoadResult<ModelAsset> {
        let nodes = self
            .document
            .nodes()
            .map(|node| self.load_node(node))
            .collect();
        let skins = self
            .document
            .skins()
            .map(|skin| self.load_skin(skin))
            .collect::<Result<_, _>>()?;
        let animations = self
            .document
            .animations()
            .map(|animation| self.load_animation(animation))
            .collect::<Result<_, _>>()?;
        let scenes = self
            .document
            .scenes()
            .map(|scene| self.load_scene(scene))
            .collect();

        let model = ModelAsset {
            nodes,
            skins,
            animations,
            scenes,
            default_scene: self.document.default_scene().map(|scene| scene.index()),
        };
        model.validate()?;
        debug!(
            "Loaded model with {} nodes, {} skins, {} animations",
            model.nodes.len(),
            model.skins.len(),
            model.animations.len()
        );
        Ok(model)
    }
}

fn load_gltf(gltf: Gltf, base: Option<&Path>) -> GltfLoadResult<ModelAsset> {
    let Gltf { document, blob } = gltf;
    let buffers = gltf::import_buffers(&document, base, blob)?;
    GltfDocumentLoader::new(&document, &buffers).load()
}

/// Load a GLTF or GLB file from the file system.
///
/// Only node, skin, animation and scene tables are read. Images are never
/// decoded, and relative buffer URIs are resolved against the file's directory.
pub fn load_gltf_from_path<P: AsRef<Path>>(path: P) -> GltfLoadResult<ModelAsset> {
    let path = path.as_ref();
    let gltf = Gltf::open(path)?;
    load_gltf(gltf, path.parent())
}

/// Load a GLTF or GLB file from a slice.
///
/// Buffers must be embedded, either in the GLB binary chunk or as data URIs.
pub fn load_gltf_from_slice(buffer: &[u8]) -> GltfLoadResult<ModelAsset> {
    let gltf = Gltf::from_slice(buffer)?;
    load_gltf(gltf, None)
}
