use std::fmt::Display;

/// The two iOS SDKs Xcode builds a framework against.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum IosSdk {
    Simulator,
    Device,
}

impl IosSdk {
    pub fn all() -> Vec<Self> {
        vec![Self::Device, Self::Simulator]
    }

    /// Suffix of the `Build/Products/<config>-<sdk>` directory.
    pub fn sdk_name(&self) -> &'static str {
        match self {
            Self::Simulator => "iphonesimulator",
            Self::Device => "iphoneos",
        }
    }

    /// Identifier used in `CFBundleSupportedPlatforms`.
    pub fn supported_platform(&self) -> &'static str {
        match self {
            Self::Simulator => "iPhoneSimulator",
            Self::Device => "iPhoneOS",
        }
    }
}

impl Display for IosSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sdk_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_platforms_are_device_first() {
        let platforms: Vec<_> = IosSdk::all()
            .iter()
            .map(|sdk| sdk.supported_platform())
            .collect();
        assert_eq!(platforms, vec!["iPhoneOS", "iPhoneSimulator"]);
    }

    #[test]
    fn display_is_the_sdk_directory_suffix() {
        assert_eq!(IosSdk::Simulator.to_string(), "iphonesimulator");
        assert_eq!(IosSdk::Device.to_string(), "iphoneos");
    }
}
