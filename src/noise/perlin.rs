//! Classic 3D gradient noise over Ken Perlin's reference permutation.

use glam::Vec3;

/// Ken Perlin's reference permutation of `0..=255`.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// The reference permutation, doubled so that `p[p[x] + y]` never wraps.
#[derive(Debug, Clone)]
pub struct PermutationTable {
    table: [u8; 512],
}

impl PermutationTable {
    /// Builds the 512-entry table from the reference permutation.
    pub fn new() -> Self {
        let mut table = [0u8; 512];
        for (i, &value) in PERMUTATION.iter().enumerate() {
            table[i] = value;
            table[i + 256] = value;
        }
        Self { table }
    }

    /// Returns the entry at `index`.
    ///
    /// # Panics
    /// Panics if `index >= 512`.
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.table[index] as usize
    }

    /// Number of entries (always 512).
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always false; the table is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The full doubled table as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.table
    }
}

impl Default for PermutationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 3D Perlin gradient noise remapped to `[0, 1]`.
///
/// Each instance owns its permutation table. The table is never mutated,
/// so a shared reference can be sampled from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct PerlinNoise {
    perm: PermutationTable,
}

impl PerlinNoise {
    pub fn new() -> Self {
        Self {
            perm: PermutationTable::new(),
        }
    }

    /// The permutation table backing this generator.
    pub fn permutation(&self) -> &PermutationTable {
        &self.perm
    }

    /// Samples the noise at `(x, y, z)`.
    ///
    /// # Returns
    /// A value in `[0, 1]`. Integer lattice points always return exactly 0.5.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let xi = (x.floor() as i32 & 255) as usize;
        let yi = (y.floor() as i32 & 255) as usize;
        let zi = (z.floor() as i32 & 255) as usize;

        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let p = &self.perm;
        let aaa = p.get(p.get(p.get(xi) + yi) + zi);
        let aba = p.get(p.get(p.get(xi) + inc(yi)) + zi);
        let aab = p.get(p.get(p.get(xi) + yi) + inc(zi));
        let abb = p.get(p.get(p.get(xi) + inc(yi)) + inc(zi));
        let baa = p.get(p.get(p.get(inc(xi)) + yi) + zi);
        let bba = p.get(p.get(p.get(inc(xi)) + inc(yi)) + zi);
        let bab = p.get(p.get(p.get(inc(xi)) + yi) + inc(zi));
        let bbb = p.get(p.get(p.get(inc(xi)) + inc(yi)) + inc(zi));

        let x1 = lerp(grad(aaa, xf, yf, zf), grad(baa, xf - 1.0, yf, zf), u);
        let x2 = lerp(grad(aba, xf, yf - 1.0, zf), grad(bba, xf - 1.0, yf - 1.0, zf), u);
        let y1 = lerp(x1, x2, v);

        let x1 = lerp(grad(aab, xf, yf, zf - 1.0), grad(bab, xf - 1.0, yf, zf - 1.0), u);
        let x2 = lerp(
            grad(abb, xf, yf - 1.0, zf - 1.0),
            grad(bbb, xf - 1.0, yf - 1.0, zf - 1.0),
            u,
        );
        let y2 = lerp(x1, x2, v);

        (lerp(y1, y2, w) + 1.0) / 2.0
    }

    /// Samples the noise at a vector position.
    #[inline]
    pub fn sample_vec(&self, pos: Vec3) -> f32 {
        self.sample(pos.x, pos.y, pos.z)
    }
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Dot product of the offset with one of 12 edge gradients, picked from the
/// low 4 bits of `hash` (16 cases, 4 of them repeated).
#[inline]
fn grad(hash: usize, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[inline]
fn inc(n: usize) -> usize {
    (n + 1) & 255
}
