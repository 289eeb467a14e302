use crate::boxes::FourCC;

/// Typed view over documented GPMF record keys.
///
/// Anything not in this list becomes `KnownKey::Unknown(fourcc)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownKey {
    // Structure
    Devc,
    Dvid,
    Dvnm,
    Strm,
    Stnm,
    Rmrk,
    Scal,
    Siun,
    Unit,
    Type,
    Tsmp,
    Timo,
    Empt,
    Tick,
    Tock,
    Stmp,

    // Sensors
    Accl,
    Gyro,
    Magn,
    Grav,
    Cori,
    Iori,
    Shut,
    Wbal,
    Wrgb,
    Isoe,
    Isog,
    Yavg,
    Unif,
    Scen,
    Face,
    Aalp,
    Mwet,
    Wndm,
    Mskp,
    Lskp,

    // GPS
    Gps5,
    Gps9,
    Gpsf,
    Gpsp,
    Gpsu,
    Gpsa,

    // `udta` settings stream
    Firm,
    Lens,
    Camd,
    Muid,
    Hlmt,
    Manl,

    Unknown(FourCC),
}

impl From<FourCC> for KnownKey {
    fn from(cc: FourCC) -> Self {
        match &cc.0 {
            b"DEVC" => KnownKey::Devc,
            b"DVID" => KnownKey::Dvid,
            b"DVNM" => KnownKey::Dvnm,
            b"STRM" => KnownKey::Strm,
            b"STNM" => KnownKey::Stnm,
            b"RMRK" => KnownKey::Rmrk,
            b"SCAL" => KnownKey::Scal,
            b"SIUN" => KnownKey::Siun,
            b"UNIT" => KnownKey::Unit,
            b"TYPE" => KnownKey::Type,
            b"TSMP" => KnownKey::Tsmp,
            b"TIMO" => KnownKey::Timo,
            b"EMPT" => KnownKey::Empt,
            b"TICK" => KnownKey::Tick,
            b"TOCK" => KnownKey::Tock,
            b"STMP" => KnownKey::Stmp,

            b"ACCL" => KnownKey::Accl,
            b"GYRO" => KnownKey::Gyro,
            b"MAGN" => KnownKey::Magn,
            b"GRAV" => KnownKey::Grav,
            b"CORI" => KnownKey::Cori,
            b"IORI" => KnownKey::Iori,
            b"SHUT" => KnownKey::Shut,
            b"WBAL" => KnownKey::Wbal,
            b"WRGB" => KnownKey::Wrgb,
            b"ISOE" => KnownKey::Isoe,
            b"ISOG" => KnownKey::Isog,
            b"YAVG" => KnownKey::Yavg,
            b"UNIF" => KnownKey::Unif,
            b"SCEN" => KnownKey::Scen,
            b"FACE" => KnownKey::Face,
            b"AALP" => KnownKey::Aalp,
            b"MWET" => KnownKey::Mwet,
            b"WNDM" => KnownKey::Wndm,
            b"MSKP" => KnownKey::Mskp,
            b"LSKP" => KnownKey::Lskp,

            b"GPS5" => KnownKey::Gps5,
            b"GPS9" => KnownKey::Gps9,
            b"GPSF" => KnownKey::Gpsf,
            b"GPSP" => KnownKey::Gpsp,
            b"GPSU" => KnownKey::Gpsu,
            b"GPSA" => KnownKey::Gpsa,

            b"FIRM" => KnownKey::Firm,
            b"LENS" => KnownKey::Lens,
            b"CAMD" => KnownKey::Camd,
            b"MUID" => KnownKey::Muid,
            b"HLMT" => KnownKey::Hlmt,
            b"MANL" => KnownKey::Manl,

            _ => KnownKey::Unknown(cc),
        }
    }
}

impl KnownKey {
    pub fn full_name(&self) -> &'static str {
        match self {
            KnownKey::Devc => "Device",
            KnownKey::Dvid => "Device ID",
            KnownKey::Dvnm => "Device Name",
            KnownKey::Strm => "Stream",
            KnownKey::Stnm => "Stream Name",
            KnownKey::Rmrk => "Remark",
            KnownKey::Scal => "Scaling Divisor",
            KnownKey::Siun => "SI Units",
            KnownKey::Unit => "Display Units",
            KnownKey::Type => "Complex Type Definition",
            KnownKey::Tsmp => "Total Samples",
            KnownKey::Timo => "Time Offset",
            KnownKey::Empt => "Empty Payload Count",
            KnownKey::Tick => "Start Tick",
            KnownKey::Tock => "End Tick",
            KnownKey::Stmp => "Microsecond Timestamp",

            KnownKey::Accl => "Accelerometer",
            KnownKey::Gyro => "Gyroscope",
            KnownKey::Magn => "Magnetometer",
            KnownKey::Grav => "Gravity Vector",
            KnownKey::Cori => "Camera Orientation",
            KnownKey::Iori => "Image Orientation",
            KnownKey::Shut => "Exposure Time",
            KnownKey::Wbal => "White Balance",
            KnownKey::Wrgb => "White Balance RGB Gains",
            KnownKey::Isoe => "Sensor ISO",
            KnownKey::Isog => "Sensor Gain",
            KnownKey::Yavg => "Average Luma",
            KnownKey::Unif => "Image Uniformity",
            KnownKey::Scen => "Scene Classification",
            KnownKey::Face => "Face Boxes",
            KnownKey::Aalp => "Audio Levels",
            KnownKey::Mwet => "Microphone Wet",
            KnownKey::Wndm => "Wind Processing",
            KnownKey::Mskp => "Main Video Frame Skip",
            KnownKey::Lskp => "Low-res Video Frame Skip",

            KnownKey::Gps5 => "GPS (lat, lon, alt, 2D speed, 3D speed)",
            KnownKey::Gps9 => "GPS (lat, lon, alt, 2D, 3D, days, secs, DOP, fix)",
            KnownKey::Gpsf => "GPS Fix",
            KnownKey::Gpsp => "GPS Precision (DOP x100)",
            KnownKey::Gpsu => "GPS UTC Time",
            KnownKey::Gpsa => "GPS Altitude Reference",

            KnownKey::Firm => "Firmware Version",
            KnownKey::Lens => "Lens Serial",
            KnownKey::Camd => "Camera Model",
            KnownKey::Muid => "Media Unique ID",
            KnownKey::Hlmt => "Highlight Markers",
            KnownKey::Manl => "Manual Highlight",

            KnownKey::Unknown(_) => "Unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, KnownKey::Unknown(_))
    }
}
