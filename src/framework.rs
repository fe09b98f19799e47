use std::path::{Path, PathBuf};

/// A `<Name>.framework` bundle inside a build products directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkBundle {
    name: String,
    products_dir: PathBuf,
}

impl FrameworkBundle {
    pub fn new(name: &str, products_dir: &Path) -> Self {
        Self {
            name: name.to_string(),
            products_dir: products_dir.to_path_buf(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn products_dir(&self) -> &Path {
        &self.products_dir
    }

    pub fn dir_name(&self) -> String {
        format!("{}.framework", self.name)
    }

    pub fn dir(&self) -> PathBuf {
        self.products_dir.join(self.dir_name())
    }

    /// `<Name>.framework/<Name>`
    pub fn binary(&self) -> PathBuf {
        self.dir().join(&self.name)
    }

    pub fn info_plist(&self) -> PathBuf {
        self.dir().join("Info.plist")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_from_name() {
        let bundle = FrameworkBundle::new("MyLib", Path::new("/build/Release-iphoneos"));
        assert_eq!(bundle.dir_name(), "MyLib.framework");
        assert_eq!(
            bundle.binary(),
            Path::new("/build/Release-iphoneos/MyLib.framework/MyLib")
        );
        assert_eq!(
            bundle.info_plist(),
            Path::new("/build/Release-iphoneos/MyLib.framework/Info.plist")
        );
    }
}
