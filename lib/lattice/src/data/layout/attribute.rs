/// The inner components of an [AttributeType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeComponent {
    U8,
    U16,
    U32,
    I8,
    I16,
    F32,
}

impl AttributeComponent {
    pub const fn size(self) -> u32 {
        use std::mem::size_of;
        (match self {
            AttributeComponent::U8 => size_of::<u8>(),
            AttributeComponent::U16 => size_of::<u16>(),
            AttributeComponent::U32 => size_of::<u32>(),
            AttributeComponent::I8 => size_of::<i8>(),
            AttributeComponent::I16 => size_of::<i16>(),
            AttributeComponent::F32 => size_of::<f32>(),
        }) as u32
    }
}

/// The shape of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AttributeType {
    pub const fn size_elements(self) -> u32 {
        match self {
            AttributeType::Scalar => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
            AttributeType::Mat2 => 4,
            AttributeType::Mat3 => 9,
            AttributeType::Mat4 => 16,
        }
    }

    pub const fn size_bytes(self, comp: AttributeComponent) -> u32 {
        comp.size() * self.size_elements()
    }
}

/// Plain-old-data types which can be stored as a vertex component.
///
/// Implemented for scalars and arrays of the [AttributeComponent] types; the size of each
/// implementor is checked against its `TYPE` and `COMPONENT` at compile time.
pub trait Attribute: bytemuck::Pod {
    const TYPE: AttributeType;
    const COMPONENT: AttributeComponent;

    #[inline]
    fn size_bytes() -> u32 {
        Self::TYPE.size_bytes(Self::COMPONENT)
    }
}

mod _impl_attr {
    use super::{Attribute, AttributeComponent, AttributeType};

    macro_rules! impl_attr {
        (@impl $t:ident, $c:ident, $Target:ty) => {
            // "size of type $Target == size of attribute $t with component $c"
            static_assertions::const_assert_eq!(
                std::mem::size_of::<$Target>(),
                AttributeType::$t.size_bytes(AttributeComponent::$c) as usize
            );
            impl Attribute for $Target {
                const TYPE: AttributeType = AttributeType::$t;
                const COMPONENT: AttributeComponent = AttributeComponent::$c;
            }
        };
        ($t:ident => $($c:ident: $C:ty),+) => {
            $(impl_attr!(@impl $t, $c, $C);)+
        };
    }

    impl_attr!(Scalar => U8: u8, U16: u16, U32: u32, I8: i8, I16: i16, F32: f32);
    impl_attr!(Vec2 => U8: [u8; 2], U16: [u16; 2], U32: [u32; 2], I8: [i8; 2], I16: [i16; 2], F32: [f32; 2]);
    impl_attr!(Vec3 => U8: [u8; 3], U16: [u16; 3], U32: [u32; 3], I8: [i8; 3], I16: [i16; 3], F32: [f32; 3]);
    impl_attr!(Vec4 => U8: [u8; 4], U16: [u16; 4], U32: [u32; 4], I8: [i8; 4], I16: [i16; 4], F32: [f32; 4]);
    impl_attr!(Mat3 => U8: [u8; 9], U16: [u16; 9], U32: [u32; 9], I8: [i8; 9], I16: [i16; 9], F32: [f32; 9]);
    impl_attr!(Mat4 => U8: [u8; 16], U16: [u16; 16], U32: [u32; 16], I8: [i8; 16], I16: [i16; 16], F32: [f32; 16]);
}

#[cfg(test)]
mod tests {
    use super::{Attribute, AttributeComponent, AttributeType};

    #[test]
    fn sizes() {
        assert_eq!(AttributeType::Vec3.size_bytes(AttributeComponent::F32), 12);
        assert_eq!(AttributeType::Mat4.size_bytes(AttributeComponent::U8), 16);
        assert_eq!(<[f32; 2]>::size_bytes(), 8);
        assert_eq!(<[u16; 4]>::TYPE, AttributeType::Vec4);
        assert_eq!(<i8>::COMPONENT, AttributeComponent::I8);
    }
}
