use image::DynamicImage;

/// EXIF orientation tag values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    Transpose = 5,
    Rotate90 = 6,
    Transverse = 7,
    Rotate270 = 8,
}

impl Orientation {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Normal),
            2 => Some(Self::FlipHorizontal),
            3 => Some(Self::Rotate180),
            4 => Some(Self::FlipVertical),
            5 => Some(Self::Transpose),
            6 => Some(Self::Rotate90),
            7 => Some(Self::Transverse),
            8 => Some(Self::Rotate270),
            _ => None,
        }
    }

    /// Read the orientation tag from an encoded image. Missing or invalid tags read as normal.
    pub fn read(data: &[u8]) -> Self {
        let mut cursor = std::io::Cursor::new(data);
        exif::Reader::new()
            .read_from_container(&mut cursor)
            .ok()
            .and_then(|exif| {
                exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                    .and_then(|field| field.value.get_uint(0))
            })
            .and_then(Self::from_u32)
            .unwrap_or(Self::Normal)
    }

    /// Rotation (clockwise degrees) and horizontal flip that bring the image upright.
    /// The rotation is applied first.
    pub fn transforms(self) -> (Option<u16>, bool, bool) {
        match self {
            Self::Normal => (None, false, false),
            Self::FlipHorizontal => (None, true, false),
            Self::Rotate180 => (Some(180), false, false),
            Self::FlipVertical => (None, false, true),
            Self::Transpose => (Some(90), true, false),
            Self::Rotate90 => (Some(90), false, false),
            Self::Transverse => (Some(270), true, false),
            Self::Rotate270 => (Some(270), false, false),
        }
    }

    /// Rotate and flip `img` so that it displays upright without the tag.
    pub fn apply(self, mut img: DynamicImage) -> DynamicImage {
        let (rotate, flip_h, flip_v) = self.transforms();

        tracing::debug!(
            orientation = self as u8,
            rotate = ?rotate,
            flip_horizontal = flip_h,
            flip_vertical = flip_v,
            "Applying EXIF orientation"
        );

        img = match rotate {
            Some(90) => img.rotate90(),
            Some(180) => img.rotate180(),
            Some(270) => img.rotate270(),
            _ => img,
        };
        if flip_h {
            img = img.fliph();
        }
        if flip_v {
            img = img.flipv();
        }
        img
    }
}
