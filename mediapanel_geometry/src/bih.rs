use crate::{materials::MaterialHandle, mesh::Triangle, Mesh};
use nalgebra_glm as glm;

const MAX_LEAF_SIZE: usize = 4;
const MAX_DEPTH: usize = 32;
const EPSILON: f32 = 1e-7;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: glm::Vec3,
    pub max: glm::Vec3,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: glm::vec3(f32::MAX, f32::MAX, f32::MAX),
            max: glm::vec3(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    pub fn around(points: impl IntoIterator<Item = glm::Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |bounds, p| BoundingBox {
            min: glm::min2(&bounds.min, &p),
            max: glm::max2(&bounds.max, &p),
        })
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: glm::min2(&self.min, &other.min),
            max: glm::max2(&self.max, &other.max),
        }
    }

    pub fn size(&self) -> glm::Vec3 {
        self.max - self.min
    }

    pub fn clip(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        let (mut near, mut far) = (t_min, t_max);
        for axis in 0..3 {
            let inv = 1.0 / ray.direction[axis];
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv;
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > near {
                near = t0;
            }
            if t1 < far {
                far = t1;
            }
            if near > far {
                return None;
            }
        }
        Some((near, far))
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: glm::Vec3,
    pub direction: glm::Vec3,
}

impl Ray {
    pub fn new(origin: glm::Vec3, direction: glm::Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> glm::Vec3 {
        self.origin + t * self.direction
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Hit {
    pub distance: f32,
    /// Index into `Bih::triangles`.
    pub triangle_index: usize,
    pub position: glm::Vec3,
    pub texcoord: glm::Vec2,
    pub material: Option<MaterialHandle>,
}

#[derive(Copy, Clone, Debug)]
pub enum BihNodeData {
    Branch {
        clip_left: f32,
        clip_right: f32,
        child_left: usize,
        child_right: usize,
    },
    Leaf {
        triangle_index: usize,
        count: usize,
    },
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BihNodeType {
    X, Y, Z, Leaf,
}

#[derive(Copy, Clone, Debug)]
pub struct BihNode {
    pub ty: BihNodeType,
    pub data: BihNodeData,
}

/// Triangles are reordered so every leaf is a contiguous run.
#[derive(Clone, Debug)]
pub struct Bih {
    pub nodes: Vec<BihNode>,
    pub triangles: Vec<Triangle>,
    pub bounds: BoundingBox,
}

impl Bih {
    pub fn new(mesh: &Mesh) -> Self {
        let mut triangles = mesh.triangles();
        if triangles.is_empty() {
            return Self {
                nodes: vec![],
                triangles,
                bounds: BoundingBox::empty(),
            };
        }

        let bounds = calculate_bounds(&triangles);
        let mut nodes = Vec::with_capacity(2 * triangles.len());
        make_hierarchy(&mut triangles, 0, bounds, 0, &mut nodes);
        nodes.shrink_to_fit();
        tracing::debug!(
            "Built BIH with {} nodes over {} triangles",
            nodes.len(),
            triangles.len()
        );

        Self {
            nodes,
            triangles,
            bounds,
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best: Option<Hit> = None;
        self.intersect_node(0, self.bounds, ray, &mut best);
        best
    }

    fn intersect_node(&self, node: usize, bounds: BoundingBox, ray: &Ray, best: &mut Option<Hit>) {
        let t_max = best.map_or(f32::MAX, |h| h.distance);
        if bounds.clip(ray, 0.0, t_max).is_none() {
            return;
        }

        let BihNode { ty, data } = self.nodes[node];
        match data {
            BihNodeData::Leaf {
                triangle_index,
                count,
            } => {
                for i in triangle_index..triangle_index + count {
                    if let Some(hit) = intersect_triangle(&self.triangles[i], i, ray) {
                        if best.map_or(true, |b| hit.distance < b.distance) {
                            *best = Some(hit);
                        }
                    }
                }
            }
            BihNodeData::Branch {
                clip_left,
                clip_right,
                child_left,
                child_right,
            } => {
                let axis = ty as usize;
                let mut left_bounds = bounds;
                left_bounds.max[axis] = clip_left;
                let mut right_bounds = bounds;
                right_bounds.min[axis] = clip_right;

                if ray.direction[axis] < 0.0 {
                    self.intersect_node(child_right, right_bounds, ray, best);
                    self.intersect_node(child_left, left_bounds, ray, best);
                } else {
                    self.intersect_node(child_left, left_bounds, ray, best);
                    self.intersect_node(child_right, right_bounds, ray, best);
                }
            }
        }
    }
}

fn calculate_bounds(triangles: &[Triangle]) -> BoundingBox {
    triangles
        .iter()
        .map(Triangle::bounds)
        .fold(BoundingBox::empty(), |s_bounds, t_bounds| s_bounds.union(&t_bounds))
}

fn make_hierarchy(
    triangles: &mut [Triangle],
    offset: usize,
    bounds: BoundingBox,
    depth: usize,
    out_nodes: &mut Vec<BihNode>,
) -> usize {
    let current = out_nodes.len();
    if triangles.len() <= MAX_LEAF_SIZE || depth >= MAX_DEPTH {
        out_nodes.push(make_leaf(offset, triangles.len()));
        return current;
    }

    let ty = choose_split_axis(bounds);
    let axis = ty as usize;
    let split_at = split(triangles, axis, bounds);
    let (left, right) = triangles.split_at_mut(split_at);

    let clip_left = left
        .iter()
        .map(|t| t.bounds().max[axis])
        .fold(f32::MIN, f32::max);
    let clip_right = right
        .iter()
        .map(|t| t.bounds().min[axis])
        .fold(f32::MAX, f32::min);

    // Reserve this node's slot, children are appended after it.
    out_nodes.push(make_leaf(offset, 0));

    let mut left_bounds = bounds;
    left_bounds.max[axis] = clip_left;
    let mut right_bounds = bounds;
    right_bounds.min[axis] = clip_right;

    let child_left = make_hierarchy(left, offset, left_bounds, depth + 1, out_nodes);
    let child_right = make_hierarchy(right, offset + split_at, right_bounds, depth + 1, out_nodes);

    out_nodes[current] = BihNode {
        ty,
        data: BihNodeData::Branch {
            clip_left,
            clip_right,
            child_left,
            child_right,
        },
    };
    current
}

fn make_leaf(triangle_index: usize, count: usize) -> BihNode {
    BihNode {
        ty: BihNodeType::Leaf,
        data: BihNodeData::Leaf {
            triangle_index,
            count,
        },
    }
}

/// Returns the size of the left part, always in `1..len`.
fn split(triangles: &mut [Triangle], axis: usize, bounds: BoundingBox) -> usize {
    let middle = 0.5 * (bounds.min[axis] + bounds.max[axis]);
    let mut left = 0;
    for i in 0..triangles.len() {
        if triangles[i].centroid()[axis] < middle {
            triangles.swap(i, left);
            left += 1;
        }
    }

    if left == 0 || left == triangles.len() {
        triangles.sort_by(|a, b| a.centroid()[axis].total_cmp(&b.centroid()[axis]));
        left = triangles.len() / 2;
    }
    left
}

fn choose_split_axis(bounds: BoundingBox) -> BihNodeType {
    let box_size = bounds.size();
    if box_size[0] > box_size[1] && box_size[0] > box_size[2] {
        BihNodeType::X
    } else if box_size[1] > box_size[2] {
        BihNodeType::Y
    } else {
        BihNodeType::Z
    }
}

// Möller-Trumbore, double sided.
fn intersect_triangle(triangle: &Triangle, index: usize, ray: &Ray) -> Option<Hit> {
    let [a, b, c] = triangle.positions;
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(&edge2);
    let det = edge1.dot(&p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&edge1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&q) * inv_det;
    if t <= EPSILON {
        return None;
    }

    let [ta, tb, tc] = triangle.texcoords;
    Some(Hit {
        distance: t,
        triangle_index: index,
        position: ray.at(t),
        texcoord: (1.0 - u - v) * ta + u * tb + v * tc,
        material: triangle.material,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn empty_mesh_never_hits() {
        let bih = Bih::new(&Mesh::default());
        assert!(bih.nodes.is_empty());
        let ray = Ray::new(glm::vec3(0.0, 0.0, 1.0), glm::vec3(0.0, 0.0, -1.0));
        assert!(bih.intersect(&ray).is_none());
    }

    #[test]
    fn quad_hit_interpolates_texcoords() {
        let quad = shapes::quad(2.0, 2.0, MaterialHandle(3));
        let bih = Bih::new(&quad);
        let ray = Ray::new(glm::vec3(0.5, 0.2, 2.0), glm::vec3(0.0, 0.0, -1.0));

        let hit = bih.intersect(&ray).expect("ray should hit the quad");
        assert!(approx(hit.distance, 2.0));
        assert!(approx(hit.position.x, 0.5) && approx(hit.position.y, 0.2));
        // v runs top to bottom.
        assert!(approx(hit.texcoord.x, 0.75));
        assert!(approx(hit.texcoord.y, 0.4));
        assert_eq!(hit.material, Some(MaterialHandle(3)));
    }

    #[test]
    fn ray_pointing_away_misses() {
        let quad = shapes::quad(2.0, 2.0, MaterialHandle(0));
        let bih = Bih::new(&quad);
        let ray = Ray::new(glm::vec3(0.0, 0.0, 2.0), glm::vec3(0.0, 0.0, 1.0));
        assert!(bih.intersect(&ray).is_none());
    }

    #[test]
    fn sphere_hierarchy_matches_brute_force() {
        let sphere = shapes::sphere(2.0, 16, 12, MaterialHandle(1));
        let bih = Bih::new(&sphere);
        assert!(bih.nodes.len() > 1);
        assert_eq!(bih.triangles.len(), 16 * 12 * 2);

        let directions = [
            glm::vec3(1.0, 0.0, 0.0),
            glm::vec3(0.3, 0.8, -0.2),
            glm::vec3(-0.5, -0.5, 0.7),
            glm::vec3(0.0, 0.0, -1.0),
        ];
        for direction in directions {
            let ray = Ray::new(glm::vec3(0.1, 0.05, -0.1), direction.normalize());
            let hit = bih.intersect(&ray).expect("ray from inside must hit the sphere");

            let brute = bih
                .triangles
                .iter()
                .enumerate()
                .filter_map(|(i, t)| intersect_triangle(t, i, &ray))
                .map(|h| h.distance)
                .fold(f32::MAX, f32::min);
            assert!(approx(hit.distance, brute));
            // Faceted sphere: hit lies just inside the radius.
            let r = glm::length(&hit.position);
            assert!(r <= 2.0 + 1e-4 && r > 1.8);
        }
    }

    #[test]
    fn split_axis_follows_longest_extent() {
        let bounds = BoundingBox {
            min: glm::vec3(0.0, 0.0, 0.0),
            max: glm::vec3(1.0, 4.0, 2.0),
        };
        assert_eq!(choose_split_axis(bounds), BihNodeType::Y);
    }
}
