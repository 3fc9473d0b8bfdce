use glam::Vec4;

/// Fixed-width native-endian encoding of a recorded value.
pub trait AsBytes<const N: usize> {
    fn from_bytes(b: [u8; N]) -> Self;

    fn to_bytes(self) -> [u8; N];
}

impl AsBytes<1> for u8 {
    fn from_bytes(b: [u8; 1]) -> Self {
        b[0]
    }

    fn to_bytes(self) -> [u8; 1] {
        [self]
    }
}

impl AsBytes<4> for u32 {
    fn from_bytes(b: [u8; 4]) -> Self {
        u32::from_ne_bytes(b)
    }

    fn to_bytes(self) -> [u8; 4] {
        self.to_ne_bytes()
    }
}

impl AsBytes<8> for u64 {
    fn from_bytes(b: [u8; 8]) -> Self {
        u64::from_ne_bytes(b)
    }

    fn to_bytes(self) -> [u8; 8] {
        self.to_ne_bytes()
    }
}

impl AsBytes<4> for f32 {
    fn from_bytes(b: [u8; 4]) -> Self {
        f32::from_ne_bytes(b)
    }

    fn to_bytes(self) -> [u8; 4] {
        self.to_ne_bytes()
    }
}

impl AsBytes<16> for Vec4 {
    fn from_bytes(b: [u8; 16]) -> Self {
        Vec4::from_array(std::array::from_fn(|i| {
            f32::from_ne_bytes([b[4 * i], b[4 * i + 1], b[4 * i + 2], b[4 * i + 3]])
        }))
    }

    fn to_bytes(self) -> [u8; 16] {
        let mut b = [0; 16];

        for (chunk, v) in b.chunks_exact_mut(4).zip(self.to_array()) {
            chunk.copy_from_slice(&v.to_bytes());
        }

        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec4_components_are_laid_out_in_order() {
        let v = Vec4::new(1.0, -2.5, 0.125, 3.0e8);
        let b = v.to_bytes();

        assert_eq!(&b[4..8], &(-2.5f32).to_ne_bytes());
        assert_eq!(Vec4::from_bytes(b), v);
    }
}
