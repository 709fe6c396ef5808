use std::fmt;
use std::str::FromStr;

/// A Newznab media category id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(u32);

macro_rules! categories {
    ($($konst:ident = $id:literal, $name:literal;)*) => {
        impl Category {
            $(pub const $konst: Category = Category($id);)*

            /// Every standard category, in id order.
            pub const ALL: &'static [Category] = &[$(Category::$konst),*];

            /// Kebab-case name of a standard category.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($id => Some($name),)*
                    _ => None,
                }
            }

            fn from_name(name: &str) -> Option<Category> {
                match name {
                    $($name => Some(Category::$konst),)*
                    _ => None,
                }
            }
        }
    };
}

categories! {
    CONSOLE = 1000, "console";
    CONSOLE_NDS = 1010, "console-nds";
    CONSOLE_PSP = 1020, "console-psp";
    CONSOLE_WII = 1030, "console-wii";
    CONSOLE_XBOX = 1040, "console-xbox";
    CONSOLE_XBOX360 = 1050, "console-xbox360";
    CONSOLE_WIIWARE = 1060, "console-wiiware";
    CONSOLE_XBOX360_DLC = 1070, "console-xbox360-dlc";

    MOVIES = 2000, "movies";
    MOVIES_FOREIGN = 2010, "movies-foreign";
    MOVIES_OTHER = 2020, "movies-other";
    MOVIES_SD = 2030, "movies-sd";
    MOVIES_HD = 2040, "movies-hd";
    MOVIES_UHD = 2045, "movies-uhd";
    MOVIES_BLURAY = 2050, "movies-bluray";
    MOVIES_3D = 2060, "movies-3d";

    AUDIO = 3000, "audio";
    AUDIO_MP3 = 3010, "audio-mp3";
    AUDIO_VIDEO = 3020, "audio-video";
    AUDIO_AUDIOBOOK = 3030, "audio-audiobook";
    AUDIO_LOSSLESS = 3040, "audio-lossless";

    PC = 4000, "pc";
    PC_0DAY = 4010, "pc-0day";
    PC_ISO = 4020, "pc-iso";
    PC_MAC = 4030, "pc-mac";
    PC_MOBILE_OTHER = 4040, "pc-mobile-other";
    PC_GAMES = 4050, "pc-games";
    PC_MOBILE_IOS = 4060, "pc-mobile-ios";
    PC_MOBILE_ANDROID = 4070, "pc-mobile-android";

    TV = 5000, "tv";
    TV_FOREIGN = 5020, "tv-foreign";
    TV_SD = 5030, "tv-sd";
    TV_HD = 5040, "tv-hd";
    TV_UHD = 5045, "tv-uhd";
    TV_OTHER = 5050, "tv-other";
    TV_SPORT = 5060, "tv-sport";
    TV_ANIME = 5070, "tv-anime";
    TV_DOCUMENTARY = 5080, "tv-documentary";

    XXX = 6000, "xxx";
    XXX_DVD = 6010, "xxx-dvd";
    XXX_WMV = 6020, "xxx-wmv";
    XXX_XVID = 6030, "xxx-xvid";
    XXX_X264 = 6040, "xxx-x264";
    XXX_PACK = 6050, "xxx-pack";
    XXX_IMGSET = 6060, "xxx-imgset";
    XXX_OTHER = 6070, "xxx-other";

    BOOKS = 7000, "books";
    BOOKS_MAGS = 7010, "books-mags";
    BOOKS_EBOOK = 7020, "books-ebook";
    BOOKS_COMICS = 7030, "books-comics";

    OTHER = 8000, "other";
    OTHER_MISC = 8010, "other-misc";
}

impl Category {
    /// Any id, including site-specific ones outside the standard table.
    pub const fn from_id(id: u32) -> Self {
        Category(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    /// The top-level category this one belongs to, e.g. `TV` for `TV_HD`.
    pub const fn parent(self) -> Category {
        Category(self.0 / 1000 * 1000)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts a numeric id (`5040`) or a name (`tv-hd`, `TV_HD`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u32>() {
            return Ok(Category(id));
        }
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        Category::from_name(&normalized).ok_or_else(|| format!("unknown category: {}", s))
    }
}
