/// Render layer. Controls draw order.
///
/// Layers are drawn back-to-front: Background first, Ui last.
/// Default layer is `Layer1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    Background = 0,
    #[default]
    Layer1 = 1,
    Layer2 = 2,
    Layer3 = 3,
    Layer4 = 4,
    Layer5 = 5,
    Foreground = 6,
    Ui = 7,
}

impl RenderLayer {
    /// Total number of render layers.
    pub const COUNT: usize = 8;

    /// Every layer in stacking order.
    pub const ALL: [RenderLayer; Self::COUNT] = [
        Self::Background,
        Self::Layer1,
        Self::Layer2,
        Self::Layer3,
        Self::Layer4,
        Self::Layer5,
        Self::Foreground,
        Self::Ui,
    ];

    /// Returns None if the value is out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Layer1 => "layer_1",
            Self::Layer2 => "layer_2",
            Self::Layer3 => "layer_3",
            Self::Layer4 => "layer_4",
            Self::Layer5 => "layer_5",
            Self::Foreground => "foreground",
            Self::Ui => "ui",
        }
    }
}
