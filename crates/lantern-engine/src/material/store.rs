use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::{MaterialPropertyError, TextureRef};

/// Kind tag of a [`PropertyValue`], used in lookup errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Texture,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Texture => "texture",
            PropertyKind::Float => "float",
            PropertyKind::Vec2 => "vec2",
            PropertyKind::Vec3 => "vec3",
            PropertyKind::Vec4 => "vec4",
            PropertyKind::Mat4 => "mat4",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PropertyValue {
    Texture(TextureRef),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Texture(_) => PropertyKind::Texture,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Vec2(_) => PropertyKind::Vec2,
            PropertyValue::Vec3(_) => PropertyKind::Vec3,
            PropertyValue::Vec4(_) => PropertyKind::Vec4,
            PropertyValue::Mat4(_) => PropertyKind::Mat4,
        }
    }
}

/// Lookup contract between the renderer and a material implementation.
///
/// Only [`property`](Self::property) is required. The typed accessors are exact:
/// an absent name or a value of another kind is an error, never a default.
pub trait MaterialSource {
    fn property(&self, name: &str) -> Option<&PropertyValue>;

    fn texture(&self, name: &str) -> Result<TextureRef, MaterialPropertyError> {
        typed(self, name, PropertyKind::Texture, |v| match v {
            PropertyValue::Texture(t) => Some(*t),
            _ => None,
        })
    }

    fn float(&self, name: &str) -> Result<f32, MaterialPropertyError> {
        typed(self, name, PropertyKind::Float, |v| match v {
            PropertyValue::Float(x) => Some(*x),
            _ => None,
        })
    }

    fn vec2(&self, name: &str) -> Result<Vec2, MaterialPropertyError> {
        typed(self, name, PropertyKind::Vec2, |v| match v {
            PropertyValue::Vec2(x) => Some(*x),
            _ => None,
        })
    }

    fn vec3(&self, name: &str) -> Result<Vec3, MaterialPropertyError> {
        typed(self, name, PropertyKind::Vec3, |v| match v {
            PropertyValue::Vec3(x) => Some(*x),
            _ => None,
        })
    }

    fn vec4(&self, name: &str) -> Result<Vec4, MaterialPropertyError> {
        typed(self, name, PropertyKind::Vec4, |v| match v {
            PropertyValue::Vec4(x) => Some(*x),
            _ => None,
        })
    }

    fn mat4(&self, name: &str) -> Result<Mat4, MaterialPropertyError> {
        typed(self, name, PropertyKind::Mat4, |v| match v {
            PropertyValue::Mat4(x) => Some(*x),
            _ => None,
        })
    }
}

fn typed<M, T>(
    source: &M,
    name: &str,
    expected: PropertyKind,
    extract: impl FnOnce(&PropertyValue) -> Option<T>,
) -> Result<T, MaterialPropertyError>
where
    M: MaterialSource + ?Sized,
{
    let value = source
        .property(name)
        .ok_or_else(|| MaterialPropertyError::Missing {
            name: name.to_string(),
        })?;

    extract(value).ok_or_else(|| MaterialPropertyError::WrongKind {
        name: name.to_string(),
        expected,
        found: value.kind(),
    })
}

/// Name-keyed property bag.
///
/// Setting a name again replaces the previous value, whatever its kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialStore {
    properties: HashMap<String, PropertyValue>,
}

impl MaterialStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) -> &mut Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn set_texture(&mut self, name: impl Into<String>, texture: TextureRef) -> &mut Self {
        self.set(name, PropertyValue::Texture(texture))
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) -> &mut Self {
        self.set(name, PropertyValue::Float(value))
    }

    pub fn set_vec2(&mut self, name: impl Into<String>, value: Vec2) -> &mut Self {
        self.set(name, PropertyValue::Vec2(value))
    }

    pub fn set_vec3(&mut self, name: impl Into<String>, value: Vec3) -> &mut Self {
        self.set(name, PropertyValue::Vec3(value))
    }

    pub fn set_vec4(&mut self, name: impl Into<String>, value: Vec4) -> &mut Self {
        self.set(name, PropertyValue::Vec4(value))
    }

    pub fn set_mat4(&mut self, name: impl Into<String>, value: Mat4) -> &mut Self {
        self.set(name, PropertyValue::Mat4(value))
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl MaterialSource for MaterialStore {
    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}
