use fnv::FnvHashMap;
use glam::Vec3;

/// Handle to one entry of a [`RenderScene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableId(pub u32);

/// Everything a renderer needs to draw a single bubble.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub position: Vec3,
    /// Base sphere radius in meters.
    pub radius: f32,
    /// Multiplier applied on top of `radius`.
    pub scale: f32,
    /// Material opacity in \[0, 1\].
    pub opacity: f32,
    /// Euler angles in radians.
    pub rotation: Vec3,
    /// Hue in \[0, 1\).
    pub hue: f32,
}

pub trait RenderScene {
    fn add(&mut self, renderable: Renderable) -> RenderableId;
    /// Overwrite an existing entry. Unknown ids are ignored.
    fn update(&mut self, id: RenderableId, renderable: &Renderable);
    /// Detach an entry; returns false when it was not present.
    fn remove(&mut self, id: RenderableId) -> bool;
}

#[derive(Default)]
pub struct SceneGraph {
    entries: FnvHashMap<RenderableId, Renderable>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, id: RenderableId) -> Option<&Renderable> {
        self.entries.get(&id)
    }

    #[allow(dead_code)]
    pub fn contains(&self, id: RenderableId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RenderableId, &Renderable)> {
        self.entries.iter().map(|(id, r)| (*id, r))
    }
}

impl RenderScene for SceneGraph {
    fn add(&mut self, renderable: Renderable) -> RenderableId {
        let id = RenderableId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(id, renderable);
        id
    }

    fn update(&mut self, id: RenderableId, renderable: &Renderable) {
        if let Some(slot) = self.entries.get_mut(&id) {
            *slot = *renderable;
        }
    }

    fn remove(&mut self, id: RenderableId) -> bool {
        self.entries.remove(&id).is_some()
    }
}

/// Convert HSL (all components in \[0, 1\]) to linear-ish RGB in \[0, 1\].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h.rem_euclid(1.0);
    [
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
