//! Property tests for the rewrite pipeline.

use proptest::prelude::*;
use source_patcher::{PatcherConfig, RuleSet, Target};

fn rules() -> RuleSet {
    RuleSet::from_config(&PatcherConfig::default()).unwrap()
}

/// Source lines that exercise every rule, alone and in combination.
fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "import { Send, Sparkles } from 'lucide-react'",
        "import Link from 'next/link'",
        "let fid = 1;",
        "let fid = require('./fid')",
        "let other = 2;",
        "const x = require('x')",
        "const { a, b } = require(\"ab\")",
        "  value: any;",
        "  items: any[];",
        "catch (error: any) {",
        "const m = useState<any>(null)",
        "  useEffect(() => {",
        "  }, [])",
        "  return (",
        "    <p>It's \"great\"</p>",
        "    <h2>Leah's \"plan\" isn't",
        "    done</h2>",
        "  )",
        "}",
        "",
    ])
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|lines| lines.join("\n"))
}

fn path() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "components/Footer.tsx",
        "app/api/lead-magnet/route.ts",
        "lib/api-client.ts",
        "scripts/test-schema.js",
    ])
}

proptest! {
    #[test]
    fn second_rewrite_is_a_no_op(text in document(), relative in path()) {
        let rules = rules();
        let target = Target::relative(relative);
        let once = rules.rewrite(&text, &target);
        prop_assert!(once.converged);

        let twice = rules.rewrite(&once.text, &target);
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert!(twice.fired.is_empty());
    }

    #[test]
    fn text_without_trigger_characters_is_preserved(
        text in "[a-km-pr-z0-9 \n;.=(){}_]{0,200}",
        relative in path(),
    ) {
        let rewrite = rules().rewrite(&text, &Target::relative(relative));
        prop_assert_eq!(rewrite.text, text);
    }
}
