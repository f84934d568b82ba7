// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalizes `frame_metadata`'s V14/V15/V16 shapes into one representation
//! so the rest of this crate never has to match on metadata version again.

use frame_metadata::{RuntimeMetadata, RuntimeMetadataPrefixed};
use parity_scale_codec::Decode;
use scale_info::form::PortableForm;
use scale_info::PortableRegistry;
use thiserror::Error;

/// One shape of a storage entry: a single value, or a map keyed by one or
/// more hashed key components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageShapeMeta {
    Plain,
    Map,
}

#[derive(Debug, Clone)]
pub struct NormalizedStorageEntry {
    pub name: String,
    pub shape: StorageShapeMeta,
    pub key_type_id: Option<u32>,
    pub value_type_id: u32,
    pub hashers: Vec<String>,
    pub default: Vec<u8>,
    pub docs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NormalizedConstant {
    pub name: String,
    pub type_id: u32,
    pub value: Vec<u8>,
    pub docs: Vec<String>,
}

/// A pallet's decode-relevant surface. Call/event/error variants are *not*
/// pre-flattened here: they live in the shared [`PortableRegistry`] as
/// `TypeDef::Variant`s, looked up by `call_type_id`/`event_type_id`/
/// `error_type_id` at the point of use (catalog building, or decoding).
#[derive(Debug, Clone)]
pub struct NormalizedPallet {
    pub index: u8,
    pub name: String,
    pub call_type_id: Option<u32>,
    pub event_type_id: Option<u32>,
    pub error_type_id: Option<u32>,
    pub storage: Vec<NormalizedStorageEntry>,
    pub constants: Vec<NormalizedConstant>,
}

#[derive(Debug, Clone)]
pub struct NormalizedSignedExtension {
    pub identifier: String,
    pub extra_type_id: u32,
    pub additional_type_id: u32,
}

/// The extrinsic envelope's type ids. V14 exposes a single composite
/// `UncheckedExtrinsic<Address, Call, Signature, Extra>` type and its
/// `Address`/`Call`/`Signature`/`Extra` type parameters are recovered by
/// name; V15/V16 expose each of those as its own field directly. Only
/// `call_type_id` is load-bearing for this crate (§4.2/§4.6 only need the
/// pallet/call/args tree out of an extrinsic, not signature verification),
/// so the others stay optional rather than forcing every version onto one
/// shape.
#[derive(Debug, Clone)]
pub struct NormalizedExtrinsic {
    pub versions: Vec<u8>,
    pub address_type_id: Option<u32>,
    pub call_type_id: u32,
    pub signature_type_id: Option<u32>,
    pub extra_type_id: Option<u32>,
    pub signed_extensions: Vec<NormalizedSignedExtension>,
}

/// A chain's metadata, normalized to a single shape regardless of which
/// `frame_metadata` version it arrived as.
#[derive(Debug, Clone)]
pub struct DecodedMetadata {
    pub registry: PortableRegistry,
    pub pallets: Vec<NormalizedPallet>,
    pub extrinsic: NormalizedExtrinsic,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to SCALE-decode runtime metadata: {0}")]
    Decode(#[from] parity_scale_codec::Error),
    #[error("unsupported or deprecated runtime metadata version")]
    UnsupportedVersion,
    #[error("pallet {pallet} references type id {type_id} which is absent from the type registry")]
    DanglingTypeId { pallet: String, type_id: u32 },
    #[error("extrinsic type {0} has no 'Call' type parameter")]
    MissingCallTypeParam(u32),
}

impl DecodedMetadata {
    /// Parses the opaque bytes returned by `state_getMetadata`/`Metadata_metadata`.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, MetadataError> {
        let prefixed = RuntimeMetadataPrefixed::decode(&mut &raw[..])?;
        match prefixed.1 {
            RuntimeMetadata::V14(md) => Self::from_v14(md),
            RuntimeMetadata::V15(md) => Self::from_v15(md),
            RuntimeMetadata::V16(md) => Self::from_v16(md),
            _ => Err(MetadataError::UnsupportedVersion),
        }
    }

    fn from_v14(md: frame_metadata::v14::RuntimeMetadataV14) -> Result<Self, MetadataError> {
        let registry = md.types;
        let pallets = md
            .pallets
            .into_iter()
            .map(|p| normalize_pallet_v14(p, &registry))
            .collect::<Result<Vec<_>, _>>()?;
        let extrinsic = normalize_extrinsic_v14(md.extrinsic, &registry)?;
        Ok(DecodedMetadata {
            registry,
            pallets,
            extrinsic,
        })
    }

    fn from_v15(md: frame_metadata::v15::RuntimeMetadataV15) -> Result<Self, MetadataError> {
        let registry = md.types;
        let pallets = md
            .pallets
            .into_iter()
            .map(|p| normalize_pallet_v15(p, &registry))
            .collect::<Result<Vec<_>, _>>()?;
        let extrinsic = normalize_extrinsic_v15(md.extrinsic);
        Ok(DecodedMetadata {
            registry,
            pallets,
            extrinsic,
        })
    }

    fn from_v16(md: frame_metadata::v16::RuntimeMetadataV16) -> Result<Self, MetadataError> {
        let registry = md.types;
        let pallets = md
            .pallets
            .into_iter()
            .map(|p| normalize_pallet_v16(p, &registry))
            .collect::<Result<Vec<_>, _>>()?;
        let extrinsic = normalize_extrinsic_v16(md.extrinsic);
        Ok(DecodedMetadata {
            registry,
            pallets,
            extrinsic,
        })
    }

    /// Resolves the portable [`scale_info::Type`] backing a storage value,
    /// walking the `Option<T>` wrapper storage uses for the "optional"
    /// modifier when present, per §4.5 `StorageMissing` handling.
    pub fn resolve(&self, type_id: u32) -> Option<&scale_info::Type<PortableForm>> {
        self.registry.resolve(type_id)
    }

    pub fn pallet_by_name(&self, name: &str) -> Option<&NormalizedPallet> {
        self.pallets.iter().find(|p| p.name == name)
    }

    pub fn pallet_by_index(&self, index: u8) -> Option<&NormalizedPallet> {
        self.pallets.iter().find(|p| p.index == index)
    }
}

macro_rules! normalize_storage_hasher_fn {
    ($fn_name:ident, $version:ident) => {
        fn $fn_name(h: &frame_metadata::$version::StorageHasher) -> &'static str {
            use frame_metadata::$version::StorageHasher::*;
            match h {
                Blake2_128 => "Blake2_128",
                Blake2_256 => "Blake2_256",
                Blake2_128Concat => "Blake2_128Concat",
                Twox128 => "Twox128",
                Twox256 => "Twox256",
                Twox64Concat => "Twox64Concat",
                Identity => "Identity",
            }
        }
    };
}

normalize_storage_hasher_fn!(normalize_storage_hasher_v14, v14);
normalize_storage_hasher_fn!(normalize_storage_hasher_v15, v15);
normalize_storage_hasher_fn!(normalize_storage_hasher_v16, v16);

macro_rules! normalize_pallet_fn {
    ($fn_name:ident, $version:ident, $hasher_fn:ident) => {
        fn $fn_name(
            pallet: frame_metadata::$version::PalletMetadata<PortableForm>,
            registry: &PortableRegistry,
        ) -> Result<NormalizedPallet, MetadataError> {
            let name = pallet.name.clone();
            let storage = pallet
                .storage
                .map(|s| {
                    s.entries
                        .into_iter()
                        .map(|entry| {
                            let (shape, key_type_id, value_type_id, hashers) = match entry.ty {
                                frame_metadata::$version::StorageEntryType::Plain(ty) => {
                                    (StorageShapeMeta::Plain, None, ty.id, Vec::new())
                                }
                                frame_metadata::$version::StorageEntryType::Map {
                                    hashers,
                                    key,
                                    value,
                                } => (
                                    StorageShapeMeta::Map,
                                    Some(key.id),
                                    value.id,
                                    hashers
                                        .iter()
                                        .map($hasher_fn)
                                        .map(str::to_string)
                                        .collect(),
                                ),
                            };
                            NormalizedStorageEntry {
                                name: entry.name,
                                shape,
                                key_type_id,
                                value_type_id,
                                hashers,
                                default: entry.default,
                                docs: entry.docs,
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();

            let constants = pallet
                .constants
                .into_iter()
                .map(|c| NormalizedConstant {
                    name: c.name,
                    type_id: c.ty.id,
                    value: c.value,
                    docs: c.docs,
                })
                .collect();

            let call_type_id = pallet.calls.as_ref().map(|c| c.ty.id);
            let event_type_id = pallet.event.as_ref().map(|e| e.ty.id);
            let error_type_id = pallet.error.as_ref().map(|e| e.ty.id);

            for type_id in [call_type_id, event_type_id, error_type_id]
                .into_iter()
                .flatten()
            {
                if registry.resolve(type_id).is_none() {
                    return Err(MetadataError::DanglingTypeId {
                        pallet: name.clone(),
                        type_id,
                    });
                }
            }

            Ok(NormalizedPallet {
                index: pallet.index,
                name,
                call_type_id,
                event_type_id,
                error_type_id,
                storage,
                constants,
            })
        }
    };
}

normalize_pallet_fn!(normalize_pallet_v14, v14, normalize_storage_hasher_v14);
normalize_pallet_fn!(normalize_pallet_v15, v15, normalize_storage_hasher_v15);
normalize_pallet_fn!(normalize_pallet_v16, v16, normalize_storage_hasher_v16);

fn normalize_extrinsic_v14(
    e: frame_metadata::v14::ExtrinsicMetadata<PortableForm>,
    registry: &PortableRegistry,
) -> Result<NormalizedExtrinsic, MetadataError> {
    let extrinsic_type_id = e.ty.id;
    let resolved = registry
        .resolve(extrinsic_type_id)
        .ok_or(MetadataError::DanglingTypeId {
            pallet: "Extrinsic".to_string(),
            type_id: extrinsic_type_id,
        })?;

    let type_param_id = |wanted: &str| {
        resolved
            .type_params
            .iter()
            .find(|p| p.name == wanted)
            .and_then(|p| p.ty.as_ref())
            .map(|t| t.id)
    };

    let call_type_id =
        type_param_id("Call").ok_or(MetadataError::MissingCallTypeParam(extrinsic_type_id))?;

    Ok(NormalizedExtrinsic {
        versions: vec![e.version],
        address_type_id: type_param_id("Address"),
        call_type_id,
        signature_type_id: type_param_id("Signature"),
        extra_type_id: type_param_id("Extra"),
        signed_extensions: e
            .signed_extensions
            .into_iter()
            .map(|se| NormalizedSignedExtension {
                identifier: se.identifier,
                extra_type_id: se.ty.id,
                additional_type_id: se.additional_signed.id,
            })
            .collect(),
    })
}

fn normalize_extrinsic_v15(e: frame_metadata::v15::ExtrinsicMetadata<PortableForm>) -> NormalizedExtrinsic {
    NormalizedExtrinsic {
        versions: vec![e.version],
        address_type_id: Some(e.address_ty.id),
        call_type_id: e.call_ty.id,
        signature_type_id: Some(e.signature_ty.id),
        extra_type_id: Some(e.extra_ty.id),
        signed_extensions: e
            .signed_extensions
            .into_iter()
            .map(|se| NormalizedSignedExtension {
                identifier: se.identifier,
                extra_type_id: se.ty.id,
                additional_type_id: se.additional_signed.id,
            })
            .collect(),
    }
}

fn normalize_extrinsic_v16(e: frame_metadata::v16::ExtrinsicMetadata<PortableForm>) -> NormalizedExtrinsic {
    NormalizedExtrinsic {
        versions: e.versions,
        address_type_id: Some(e.address_ty.id),
        call_type_id: e.call_ty.id,
        signature_type_id: Some(e.signature_ty.id),
        extra_type_id: Some(e.extra_ty.id),
        signed_extensions: e
            .transaction_extensions
            .into_iter()
            .map(|se| NormalizedSignedExtension {
                identifier: se.identifier,
                extra_type_id: se.ty.id,
                additional_type_id: se.additional_signed.id,
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
