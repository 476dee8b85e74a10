//! Generated protobuf messages and gRPC stubs for the `tinkerdb` package

#![allow(clippy::all)]

tonic::include_proto!("tinkerdb");

/// Encoded descriptors for every service in `tinkerdb.proto`, served through
/// gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("tinkerdb_descriptor");
