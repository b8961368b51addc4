use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};
use serde_yaml::{from_slice, Error};

/// OpenStack coordinated release codenames, oldest first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub enum OpenStackRelease {
    Mitaka,
    Newton,
    Ocata,
    Pike,
    Queens,
    Rocky,
}

impl ToString for OpenStackRelease {
    fn to_string(&self) -> String {
        match self {
            OpenStackRelease::Mitaka => "mitaka",
            OpenStackRelease::Newton => "newton",
            OpenStackRelease::Ocata => "ocata",
            OpenStackRelease::Pike => "pike",
            OpenStackRelease::Queens => "queens",
            OpenStackRelease::Rocky => "rocky",
        }
        .into()
    }
}

impl From<OpenStackRelease> for &str {
    fn from(release: OpenStackRelease) -> &'static str {
        match release {
            OpenStackRelease::Mitaka => "mitaka",
            OpenStackRelease::Newton => "newton",
            OpenStackRelease::Ocata => "ocata",
            OpenStackRelease::Pike => "pike",
            OpenStackRelease::Queens => "queens",
            OpenStackRelease::Rocky => "rocky",
        }
    }
}

impl FromStr for OpenStackRelease {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_slice(s.as_bytes())
    }
}

/// Major-version to codename table for nova-common, the package whose
/// version pins which coordinated release the archive is shipping
pub const NOVA_COMMON_CODENAMES: &[(&str, OpenStackRelease)] = &[
    ("1", OpenStackRelease::Mitaka),
    ("2", OpenStackRelease::Newton),
    ("3", OpenStackRelease::Ocata),
    ("4", OpenStackRelease::Pike),
    ("5", OpenStackRelease::Queens),
    ("6", OpenStackRelease::Rocky),
];

/// Look up the release a package version belongs to.
///
/// Version strings may carry a Debian epoch (`2:13.0.0-0ubuntu1`), which is
/// not part of the upstream version and is skipped before the major
/// component is compared against the table.
pub fn release_for_version(package: &str, version: &str) -> Option<OpenStackRelease> {
    let table = match package {
        "nova-common" => NOVA_COMMON_CODENAMES,
        _ => return None,
    };

    let upstream = version.splitn(2, ':').last().unwrap_or(version);
    let major = upstream
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or("");

    table
        .iter()
        .find(|(m, _)| *m == major)
        .map(|(_, release)| *release)
}
