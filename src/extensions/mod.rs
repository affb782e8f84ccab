//! Optional ISO9660 extensions: Rock Ridge (POSIX semantics over SUSP)
//! and the Joliet character set, whose escape-sequence detection lives in
//! `volume::supplementary` since it's purely a volume-descriptor concern.

pub mod rock_ridge;
