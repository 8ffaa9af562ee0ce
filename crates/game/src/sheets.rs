//! The loaded sprite-sheet set the sim works against.
//!
//! Frame pixel data lives with the rendering collaborator; the sim only
//! needs extents and hotspots, so the catalog here synthesizes sheets
//! with the shipped frame geometry. Sheets are `Arc`-shared and dropped
//! with the catalog on teardown, whatever path exits.

use std::sync::Arc;

use engine_core::Extent;
use procgen::{BodyFrame, FrameBucket, JunkFrame};
use renderer::{FrameRef, SpriteSheet};

/// Frames per sun animation cycle.
pub const SUN_ANIM_FRAMES: usize = 32;
/// Sun zoom tiers (full out, half, quarter and closer).
pub const SUN_ZOOM_TIERS: usize = 3;
/// Size buckets in the orbital planet sheet.
pub const ORBITAL_SIZE_BUCKETS: usize = 6;

const NUM_FACINGS: usize = engine_core::NUM_FACINGS as usize;

/// Every sheet the interplanetary view and the lander stamp from.
#[derive(Debug, Clone)]
pub struct SheetCatalog {
    pub flagship: Arc<SpriteSheet>,
    pub orbital: Arc<SpriteSheet>,
    pub junk: Arc<SpriteSheet>,
    pub sun: Arc<SpriteSheet>,
    pub lander: Arc<SpriteSheet>,
    pub shot: Arc<SpriteSheet>,
    pub lightning: Arc<SpriteSheet>,
    pub quake: Arc<SpriteSheet>,
    pub lava: Arc<SpriteSheet>,
    pub creature: Arc<SpriteSheet>,
    pub deposit: Arc<SpriteSheet>,
    pub biocan: Arc<SpriteSheet>,
    pub explosion: Arc<SpriteSheet>,
}

impl SheetCatalog {
    /// Capture every sheet. One call per exploration session; dropping
    /// the catalog releases the lot.
    pub fn load() -> Self {
        // Orbital sheet: 16 lighting facings per size bucket, frame
        // extent equal to the bucket's sprite diameter.
        let mut orbital_frames = Vec::with_capacity(ORBITAL_SIZE_BUCKETS * NUM_FACINGS);
        for size in 0..ORBITAL_SIZE_BUCKETS {
            let d = FrameBucket {
                size: size as u8,
                facing: 0,
            }
            .diameter();
            for _ in 0..NUM_FACINGS {
                orbital_frames.push(renderer::FrameDef::centered(Extent::new(d, d)));
            }
        }

        // Space junk: starbase, Sa-Matra wreck, destroyed base, vault.
        let junk_frames = vec![
            renderer::FrameDef::centered(Extent::new(12, 12)),
            renderer::FrameDef::centered(Extent::new(28, 20)),
            renderer::FrameDef::centered(Extent::new(16, 12)),
            renderer::FrameDef::centered(Extent::new(20, 16)),
        ];

        // Sun animation: 32 frames per zoom tier, bigger when closer.
        let mut sun_frames = Vec::with_capacity(SUN_ZOOM_TIERS * SUN_ANIM_FRAMES);
        for (tier, d) in [15, 23, 31].into_iter().enumerate() {
            debug_assert!(tier < SUN_ZOOM_TIERS);
            for _ in 0..SUN_ANIM_FRAMES {
                sun_frames.push(renderer::FrameDef::centered(Extent::new(d, d)));
            }
        }

        Self {
            flagship: SpriteSheet::uniform("flagship", NUM_FACINGS, Extent::new(16, 16)),
            orbital: SpriteSheet::new("orbital", orbital_frames),
            junk: SpriteSheet::new("spacejunk", junk_frames),
            sun: SpriteSheet::new("sun", sun_frames),
            lander: SpriteSheet::uniform("lander", NUM_FACINGS, Extent::new(16, 14)),
            shot: SpriteSheet::uniform("lander-shot", 1, Extent::new(3, 3)),
            lightning: SpriteSheet::uniform("lightning", 10, Extent::new(14, 30)),
            quake: SpriteSheet::uniform("earthquake", 4, Extent::new(22, 16)),
            lava: SpriteSheet::uniform("lavaspot", 4, Extent::new(18, 14)),
            creature: SpriteSheet::uniform("lifeforms", procgen::CREATURES.len(), Extent::new(14, 12)),
            deposit: SpriteSheet::uniform("deposits", 3, Extent::new(10, 8)),
            biocan: SpriteSheet::uniform("bio-canister", 1, Extent::new(8, 8)),
            explosion: SpriteSheet::uniform("lander-explosion", 10, Extent::new(24, 24)),
        }
    }

    pub fn flagship_frame(&self, facing: i32) -> FrameRef {
        FrameRef::new(
            self.flagship.clone(),
            engine_core::normalize_facing(facing) as usize,
        )
    }

    pub fn orbital_frame(&self, bucket: FrameBucket) -> FrameRef {
        FrameRef::new(self.orbital.clone(), bucket.frame_index())
    }

    pub fn junk_frame(&self, junk: JunkFrame) -> FrameRef {
        let index = match junk {
            JunkFrame::HierarchyStarbase => 0,
            JunkFrame::SaMatra => 1,
            JunkFrame::DestroyedStarbase => 2,
            JunkFrame::PrecursorStarbase => 3,
        };
        FrameRef::new(self.junk.clone(), index)
    }

    /// Resolve a body's current frame selection to a stampable frame.
    pub fn body_frame(&self, frame: BodyFrame) -> FrameRef {
        match frame {
            BodyFrame::Orbital(bucket) => self.orbital_frame(bucket),
            BodyFrame::Junk(junk) => self.junk_frame(junk),
        }
    }

    pub fn sun_frame(&self, zoom_tier: usize, anim_index: usize) -> FrameRef {
        let tier = zoom_tier.min(SUN_ZOOM_TIERS - 1);
        FrameRef::new(
            self.sun.clone(),
            tier * SUN_ANIM_FRAMES + anim_index % SUN_ANIM_FRAMES,
        )
    }

    pub fn lander_frame(&self, facing: i32) -> FrameRef {
        FrameRef::new(
            self.lander.clone(),
            engine_core::normalize_facing(facing) as usize,
        )
    }

    pub fn deposit_frame(&self, grade: u8) -> FrameRef {
        FrameRef::new(self.deposit.clone(), grade.min(2) as usize)
    }

    pub fn creature_frame(&self, species: usize) -> FrameRef {
        FrameRef::new(self.creature.clone(), species % procgen::CREATURES.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbital_frame_extent_tracks_bucket_diameter() {
        let sheets = SheetCatalog::load();
        for size in 0..ORBITAL_SIZE_BUCKETS as u8 {
            let bucket = FrameBucket { size, facing: 5 };
            let frame = sheets.orbital_frame(bucket);
            assert_eq!(frame.extent().width, bucket.diameter());
        }
    }

    #[test]
    fn sun_tiers_grow_toward_min_zoom() {
        let sheets = SheetCatalog::load();
        let far = sheets.sun_frame(0, 0).extent().width;
        let near = sheets.sun_frame(2, 0).extent().width;
        assert!(near > far);
    }
}
