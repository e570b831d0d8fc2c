//! Scene template used as the backdrop for every thumbnail.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Empty world with a fixed camera, flat ambient light, no grid or shadows.
pub const THUMBNAIL_WORLD: &str = r#"<sdf version='1.6'>
  <world name='default'>
    <scene>
      <ambient>0.5 0.5 0.5 1</ambient>
      <background>.980392157 .980392157 .980392157 1</background>
      <shadows>0</shadows>
      <grid>0</grid>
    </scene>
    <gui fullscreen='0'>
      <camera name='user_camera'>
        <pose>5.65634 -4.1009 2.6069 0 0.275643 2.35619</pose>
        <view_controller>orbit</view_controller>
      </camera>
    </gui>
  </world>
</sdf>
"#;

/// The world template written to a temporary file for the whole run.
///
/// The file is removed when this value is dropped.
#[derive(Debug)]
pub struct SceneTemplate {
    file: NamedTempFile,
}

impl SceneTemplate {
    /// Write [`THUMBNAIL_WORLD`] to a fresh temporary file.
    pub fn create() -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("whiteworld")
            .suffix(".world")
            .tempfile()?;
        file.write_all(THUMBNAIL_WORLD.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Path of the template on disk.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
