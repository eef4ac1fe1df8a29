//! Report for a realistic integration guide, read from disk.

use rst_analyzer::{analyze_file, Report};

const GUIDE: &str = "\
==================
Slack Integration
==================

.. contents::
   :local:

Overview
========

The bot posts to a channel. See :doc:`setup` and `Slack API <https://api.slack.com>`_.

* Create an app.
* Install it.

Configuration
=============

.. code-block:: yaml

   token: xoxb-...
   channel: '#general'

.. tip::

   Use a dedicated channel.

Fields
------

:Author: Docs team
:Version: 2

.. |bot| replace:: **bot**

.. figure:: flow.png

   How messages flow.
";

fn report() -> Report {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slack.rst");
    std::fs::write(&path, GUIDE).unwrap();
    analyze_file(&path).unwrap()
}

#[test]
fn outline() {
    let r = report();
    let outline: Vec<_> = r.sections.iter().map(|s| (s.title.as_str(), s.level)).collect();
    assert_eq!(
        outline,
        vec![
            ("Slack Integration", 1),
            ("Overview", 2),
            ("Configuration", 2),
            ("Fields", 3),
        ]
    );
}

#[test]
fn directives_and_roles() {
    let r = report();
    assert_eq!(r.summary.total_directives, 4);
    assert_eq!(r.summary.unique_directives, 4);
    assert_eq!(r.summary.total_admonitions, 1);
    assert_eq!(r.summary.total_raw_html, 0);
    assert_eq!(r.admonitions.get("tip"), Some(&1));
    assert_eq!(r.roles.get("doc"), Some(&1));
    assert_eq!(r.roles.len(), 1);
}

#[test]
fn custom_elements_in_first_seen_order() {
    assert_eq!(
        report().custom_elements,
        vec![
            "topic",
            "bullet_list",
            "list_item",
            "literal_block",
            "tip",
            "field_list",
            "substitution_definition",
            "figure",
        ]
    );
}
