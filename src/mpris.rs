//! MPRIS 1 `TrackList` backend reached over the D-Bus session bus.
//!
//! The player is picked once, at connect time: the first `org.mpris.*` name
//! whose `/TrackList` object exposes both `AddTrack` and `GetLength`. Audacious additionally gets
//! play-queue insertion through its own interface.

use crate::dispatch::{SinkError, TrackSink};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zbus::blocking::Connection;

pub const TRACKLIST_INTERFACE: &str = "org.freedesktop.MediaPlayer";
const TRACKLIST_PATH: &str = "/TrackList";
const PLAYER_PREFIX: &str = "org.mpris.";
const REQUIRED_METHODS: [&str; 2] = ["AddTrack", "GetLength"];

const AUDACIOUS_NAME: &str = "org.mpris.audacious";
const AUDACIOUS_PATH: &str = "/org/atheme/audacious";
const AUDACIOUS_INTERFACE: &str = "org.atheme.audacious";

pub struct MprisSink {
    connection: Connection,
    bus_name: String,
    play_queue: bool,
}

impl MprisSink {
    /// Connect to the session bus and find a player that can add tracks.
    pub fn connect() -> Result<Self, SinkError> {
        let connection = Connection::session()?;

        for name in player_names(&connection)? {
            let methods = match introspect(&connection, &name, TRACKLIST_PATH) {
                Ok(xml) => match method_names(&xml, TRACKLIST_INTERFACE) {
                    Ok(methods) => methods,
                    Err(e) => {
                        log::debug!("skipping {}: unreadable introspection data: {}", name, e);
                        continue;
                    }
                },
                Err(e) => {
                    log::debug!("skipping {}: {}", name, e);
                    continue;
                }
            };
            if offers_track_list(&methods) {
                log::info!("using media player {}", name);
                let play_queue = name == AUDACIOUS_NAME;
                return Ok(MprisSink {
                    connection,
                    bus_name: name,
                    play_queue,
                });
            }
        }
        Err(SinkError::NoPlayer(format!(
            "{}.{{{}}}",
            TRACKLIST_INTERFACE,
            REQUIRED_METHODS.join(", ")
        )))
    }

    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }
}

impl TrackSink for MprisSink {
    fn add_item(&mut self, address: &str, play_now: bool) -> Result<i32, SinkError> {
        let reply = self.connection.call_method(
            Some(self.bus_name.as_str()),
            TRACKLIST_PATH,
            Some(TRACKLIST_INTERFACE),
            "AddTrack",
            &(address, play_now),
        )?;
        let status: i32 = reply.body().deserialize()?;
        if status < 0 {
            return Err(SinkError::Call(format!("AddTrack returned {}", status)));
        }
        Ok(status)
    }

    fn current_length(&mut self) -> Result<i32, SinkError> {
        let reply = self.connection.call_method(
            Some(self.bus_name.as_str()),
            TRACKLIST_PATH,
            Some(TRACKLIST_INTERFACE),
            "GetLength",
            &(),
        )?;
        Ok(reply.body().deserialize::<i32>()?)
    }

    fn supports_queue_next(&self) -> bool {
        self.play_queue
    }

    fn queue_next(&mut self, position: i32) -> Result<(), SinkError> {
        if !self.play_queue {
            return Err(SinkError::Unsupported("queueing"));
        }
        self.connection.call_method(
            Some(self.bus_name.as_str()),
            AUDACIOUS_PATH,
            Some(AUDACIOUS_INTERFACE),
            "PlayqueueAdd",
            &(position,),
        )?;
        Ok(())
    }
}

fn player_names(connection: &Connection) -> Result<Vec<String>, SinkError> {
    let reply = connection.call_method(
        Some("org.freedesktop.DBus"),
        "/org/freedesktop/DBus",
        Some("org.freedesktop.DBus"),
        "ListNames",
        &(),
    )?;
    let names: Vec<String> = reply.body().deserialize()?;
    Ok(names
        .into_iter()
        .filter(|n| n.starts_with(PLAYER_PREFIX))
        .collect())
}

fn introspect(connection: &Connection, name: &str, path: &str) -> Result<String, SinkError> {
    let reply = connection.call_method(
        Some(name),
        path,
        Some("org.freedesktop.DBus.Introspectable"),
        "Introspect",
        &(),
    )?;
    Ok(reply.body().deserialize::<String>()?)
}

/// Method names declared directly under `interface` in a D-Bus
/// introspection document.
pub fn method_names(xml: &str, interface: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut names = Vec::new();
    // Element depth inside the matching interface; `None` while outside it.
    let mut inside: Option<usize> = None;

    loop {
        match reader.read_event()? {
            Event::Start(tag) => match inside {
                Some(depth) => {
                    if depth == 0 && tag.name().as_ref() == b"method" {
                        names.extend(name_attribute(&tag)?);
                    }
                    inside = Some(depth + 1);
                }
                None => {
                    if tag.name().as_ref() == b"interface"
                        && name_attribute(&tag)?.as_deref() == Some(interface)
                    {
                        inside = Some(0);
                    }
                }
            },
            Event::Empty(tag) => {
                if inside == Some(0) && tag.name().as_ref() == b"method" {
                    names.extend(name_attribute(&tag)?);
                }
            }
            Event::End(_) => {
                inside = match inside {
                    Some(0) | None => None,
                    Some(depth) => Some(depth - 1),
                };
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(names)
}

fn name_attribute(tag: &BytesStart) -> Result<Option<String>, quick_xml::Error> {
    match tag.try_get_attribute("name")? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Whether `methods` covers everything a sink calls on the track list.
fn offers_track_list(methods: &[String]) -> bool {
    REQUIRED_METHODS
        .iter()
        .all(|required| methods.iter().any(|m| m == required))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKLIST_XML: &str = r#"<!DOCTYPE node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
"http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd">
<node>
  <interface name="org.freedesktop.DBus.Introspectable">
    <method name="Introspect">
      <arg name="data" direction="out" type="s"/>
    </method>
  </interface>
  <interface name="org.freedesktop.MediaPlayer">
    <method name="GetLength">
      <arg type="i" direction="out"/>
    </method>
    <method name='AddTrack'>
      <arg type="s" direction="in"/>
      <arg type="b" direction="in"/>
      <arg type="i" direction="out"/>
    </method>
    <signal name="TrackListChange"/>
  </interface>
</node>"#;

    #[test]
    fn finds_methods_of_requested_interface_only() {
        assert_eq!(
            method_names(TRACKLIST_XML, TRACKLIST_INTERFACE).unwrap(),
            vec!["GetLength".to_string(), "AddTrack".to_string()]
        );
        assert_eq!(
            method_names(TRACKLIST_XML, "org.freedesktop.DBus.Introspectable").unwrap(),
            vec!["Introspect".to_string()]
        );
    }

    #[test]
    fn missing_interface_has_no_methods() {
        assert!(
            method_names(TRACKLIST_XML, "org.mpris.MediaPlayer2.TrackList")
                .unwrap()
                .is_empty()
        );
        assert!(method_names("", TRACKLIST_INTERFACE).unwrap().is_empty());
        assert!(
            method_names("<node><interface name=\"x\">", "x")
                .map_or(true, |methods| methods.is_empty())
        );
    }

    #[test]
    fn self_closing_interface_does_not_borrow_methods() {
        let xml = r#"<node>
  <interface name="org.freedesktop.MediaPlayer"/>
  <interface name="org.example.Other">
    <method name="AddTrack"/>
    <method name="GetLength"/>
  </interface>
</node>"#;
        assert!(method_names(xml, TRACKLIST_INTERFACE).unwrap().is_empty());
        assert_eq!(method_names(xml, "org.example.Other").unwrap().len(), 2);
    }

    #[test]
    fn nested_elements_are_not_methods_of_the_interface() {
        let xml = r#"<node><interface name="org.freedesktop.MediaPlayer">
  <annotation name="x"><method name="Hidden"/></annotation>
  <method name="AddTrack"><annotation name="y"/></method>
</interface></node>"#;
        assert_eq!(
            method_names(xml, TRACKLIST_INTERFACE).unwrap(),
            vec!["AddTrack".to_string()]
        );
    }

    #[test]
    fn track_list_needs_add_and_length() {
        let methods = method_names(TRACKLIST_XML, TRACKLIST_INTERFACE).unwrap();
        assert!(offers_track_list(&methods));
        assert!(!offers_track_list(&["AddTrack".to_string()]));
        assert!(!offers_track_list(&["GetLength".to_string()]));
    }
}
