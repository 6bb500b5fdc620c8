//! BxDF Flags

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Stores combination of flags describing the scattering lobes of a BxDF.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BxDFFlags: u8 {
        const UNSET = 0;
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;
        const DIFFUSE_REFLECTION = Self::DIFFUSE.bits() | Self::REFLECTION.bits();
        const DIFFUSE_TRANSMISSION = Self::DIFFUSE.bits() | Self::TRANSMISSION.bits();
        const GLOSSY_REFLECTION = Self::GLOSSY.bits() | Self::REFLECTION.bits();
        const GLOSSY_TRANSMISSION = Self::GLOSSY.bits() | Self::TRANSMISSION.bits();
        const SPECULAR_REFLECTION = Self::SPECULAR.bits() | Self::REFLECTION.bits();
        const SPECULAR_TRANSMISSION = Self::SPECULAR.bits() | Self::TRANSMISSION.bits();
        const ALL = Self::DIFFUSE.bits()
            | Self::GLOSSY.bits()
            | Self::SPECULAR.bits()
            | Self::REFLECTION.bits()
            | Self::TRANSMISSION.bits();
    }
}

impl BxDFFlags {
    /// Returns `true` if the REFLECTION flag is set.
    pub fn is_reflective(&self) -> bool {
        self.intersects(Self::REFLECTION)
    }

    /// Returns `true` if the TRANSMISSION flag is set.
    pub fn is_transmissive(&self) -> bool {
        self.intersects(Self::TRANSMISSION)
    }

    /// Returns `true` if the DIFFUSE flag is set.
    pub fn is_diffuse(&self) -> bool {
        self.intersects(Self::DIFFUSE)
    }

    /// Returns `true` if the GLOSSY flag is set.
    pub fn is_glossy(&self) -> bool {
        self.intersects(Self::GLOSSY)
    }

    /// Returns `true` if the SPECULAR flag is set.
    pub fn is_specular(&self) -> bool {
        self.intersects(Self::SPECULAR)
    }

    /// Returns `true` if the DIFFUSE or GLOSSY flags are set.
    pub fn is_non_specular(&self) -> bool {
        self.intersects(Self::DIFFUSE | Self::GLOSSY)
    }
}

impl fmt::Display for BxDFFlags {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Unset");
        }
        if self.is_reflective() {
            write!(f, "Reflection,")?;
        }
        if self.is_transmissive() {
            write!(f, "Transmission,")?;
        }
        if self.is_diffuse() {
            write!(f, "Diffuse,")?;
        }
        if self.is_glossy() {
            write!(f, "Glossy,")?;
        }
        if self.is_specular() {
            write!(f, "Specular,")?;
        }
        Ok(())
    }
}

bitflags! {
    /// Restricts sampling to reflection and/or transmission lobes.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BxDFReflTransFlags: u8 {
        const UNSET = 0;
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const ALL = Self::REFLECTION.bits() | Self::TRANSMISSION.bits();
    }
}

impl Default for BxDFReflTransFlags {
    /// Returns a filter that allows every lobe.
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for BxDFReflTransFlags {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Unset");
        }
        if self.contains(Self::REFLECTION) {
            write!(f, "Reflection,")?;
        }
        if self.contains(Self::TRANSMISSION) {
            write!(f, "Transmission,")?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
