//! Voxel add commands and the sink trait they are written to.

use glam::DVec3;

/// One voxel add command: a colored axis-aligned cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelAdd {
    /// Block corner in normalized domain units.
    pub position: DVec3,
    /// Edge length in normalized domain units.
    pub size: f64,
    /// RGB color of the block.
    pub color: [u8; 3],
}

/// Receives voxel add commands. Fire-and-forget: no return value, no
/// error path.
pub trait VoxelSink {
    fn queue_add(&mut self, add: VoxelAdd);
}

/// Records every command in order. Used by tests and offline inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub commands: Vec<VoxelAdd>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl VoxelSink for MemorySink {
    fn queue_add(&mut self, add: VoxelAdd) {
        self.commands.push(add);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let mut sink = MemorySink::new();
        for i in 0..4 {
            sink.queue_add(VoxelAdd {
                position: DVec3::new(i as f64, 0.0, 0.0),
                size: 1.0,
                color: [i as u8, 0, 0],
            });
        }
        assert_eq!(sink.len(), 4);
        assert_eq!(sink.commands[2].color, [2, 0, 0]);
        assert_eq!(sink.commands[3].position.x, 3.0);
    }
}
