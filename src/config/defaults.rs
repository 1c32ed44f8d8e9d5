//! Built-in run data: the file list, unused-symbol table and name lists used
//! when no `source-patcher.toml` is supplied.

use crate::config::schema::{
    default_scan_extensions, default_typescript_suffixes, PatcherConfig, TargetedFix,
};
use std::collections::BTreeMap;

const FILES: &[&str] = &[
    "app/admin/assessments/page.tsx",
    "app/api/assessment/admin/route.ts",
    "app/api/assessment/gdpr/route.ts",
    "app/api/assessment/submit/route.ts",
    "app/api/lead-magnet/route.ts",
    "app/api/performance-assessment/route.ts",
    "app/blog/page.tsx",
    "app/family-athlete-demo/page.tsx",
    "app/mobile-demo/page.tsx",
    "app/performance-accelerator/page.tsx",
    "components/AboutSection.tsx",
    "components/AphroditePricingTiers.tsx",
    "components/AssessmentSection.tsx",
    "components/AssessmentTool.tsx",
    "components/BarrierIdentificationSystem.tsx",
    "components/ChatWidget.tsx",
    "components/ConsultancyProgrammes.tsx",
    "components/ContactSection.tsx",
    "components/ExitIntentPopup.tsx",
    "components/FamilyTransformationTestimonials.tsx",
    "components/FloatingElements.tsx",
    "components/Footer.tsx",
    "components/HeroStatsSection.tsx",
    "components/InteractiveProgrammeGallery.tsx",
    "components/LeadMagnetDelivery.tsx",
    "components/LoadingStates.tsx",
    "components/MobileBottomNav.tsx",
    "components/MobileNav.tsx",
    "components/MobileOptimizedHero.tsx",
    "components/NorfolkCommunitySection.tsx",
    "components/OptimizedImage.tsx",
    "components/PackageSelectorQuiz.tsx",
    "components/PerformanceBreakthroughLeadMagnet.tsx",
    "components/PremiumFAQSection.tsx",
    "components/PremiumHeroSection.tsx",
    "components/PremiumHeroWithImage.tsx",
    "components/PremiumProgrammeComparison.tsx",
    "components/PremiumSocialProof.tsx",
    "components/PremiumTestimonialsSection.tsx",
    "components/PricingTiers.tsx",
    "components/ProgrammeRecommendationEngine.tsx",
    "components/ProgrammesSection.tsx",
    "components/SectionErrorBoundary.tsx",
    "components/SocialProofNotifications.tsx",
    "components/TestimonialsSection.tsx",
    "components/TruthfulTrustSection.tsx",
    "components/VideoTestimonials.tsx",
    "components/WhyChooseSection.tsx",
    "components/spacing/SpacingShowcase.tsx",
    "content/emails/nurture-sequence.ts",
    "content/schema-markup.ts",
    "hooks/useResponsive.ts",
    "lib/animations.ts",
    "lib/api-client.ts",
    "lib/assessment-questions.ts",
    "lib/assessment-scoring.ts",
    "tests/comprehensive-ui-validation.spec.ts",
    "tests/forum.test.ts",
    "tests/mobile-experience.spec.ts",
    "tests/mother-identity-transformation.spec.ts",
    "tests/performance-accelerator.spec.ts",
    "tests/screenshot-capture.spec.ts",
    "tests/spacing-validation.spec.ts",
    "tests/visual-validation.spec.ts",
    "scripts/test-hero-performance.js",
    "scripts/test-schema.js",
    "tests/quick-demo-test.js",
    "analyze-visual-issues.js",
    "comprehensive-ui-analysis.mjs",
    "test-spacing-validation.mjs",
];

const UNUSED_SYMBOLS: &[(&str, &[&str])] = &[
    (
        "app/admin/assessments/page.tsx",
        &["Tabs", "TabsContent", "TabsList", "TabsTrigger", "AlertCircle", "CheckCircle", "Filter"],
    ),
    ("app/api/", &["request"]),
    ("app/blog/page.tsx", &["Calendar"]),
    (
        "app/performance-accelerator/page.tsx",
        &["Target", "CardHeader", "CardTitle"],
    ),
    (
        "components/AboutSection.tsx",
        &[
            "BookOpen", "Briefcase", "Globe", "TrendingUp", "BadgeCheck", "Dumbbell", "Activity",
            "Brain", "Shield", "Image",
        ],
    ),
    ("components/AphroditePricingTiers.tsx", &["Zap", "Video", "Clock"]),
    ("components/AssessmentSection.tsx", &["ClipboardCheck"]),
    (
        "components/AssessmentTool.tsx",
        &["Users", "BarChart", "Clock", "Briefcase", "Activity"],
    ),
    (
        "components/BarrierIdentificationSystem.tsx",
        &["useEffect", "XCircle", "Label"],
    ),
    (
        "components/ChatWidget.tsx",
        &["X", "User", "Badge", "Card", "Textarea"],
    ),
    ("components/ConsultancyProgrammes.tsx", &["Users", "TrendingUp"]),
    (
        "components/ContactSection.tsx",
        &["MessageSquare", "Send", "Sparkles"],
    ),
    (
        "components/Footer.tsx",
        &["Send", "Sparkles", "Globe", "Clock", "Calendar"],
    ),
    ("components/InteractiveProgrammeGallery.tsx", &["Calendar", "Play"]),
    ("components/MobileBottomNav.tsx", &["Home", "ChevronUp"]),
    ("components/MobileNav.tsx", &["User"]),
    ("components/MobileOptimizedHero.tsx", &["Link"]),
    (
        "components/NorfolkCommunitySection.tsx",
        &["Image", "Star", "Activity", "Target"],
    ),
    ("components/PremiumFAQSection.tsx", &["seoOptimizedContent"]),
    (
        "components/PremiumHeroWithImage.tsx",
        &[
            "Link", "Brain", "TrendingUp", "Shield", "Activity", "ChevronRight", "CheckCircle",
            "Star",
        ],
    ),
    ("components/PremiumProgrammeComparison.tsx", &["easings"]),
    ("components/PremiumSocialProof.tsx", &["easings"]),
    (
        "components/PremiumTestimonialsSection.tsx",
        &["fadeInUp", "luxuryScale", "staggerContainer"],
    ),
    ("components/PricingTiers.tsx", &["Video", "FileText"]),
    (
        "components/ProgrammeRecommendationEngine.tsx",
        &[
            "Heart", "Smartphone", "Video", "Award", "ChevronLeft", "ChevronRight", "Tabs",
            "TabsContent", "TabsList", "TabsTrigger",
        ],
    ),
    (
        "components/ProgrammesSection.tsx",
        &["Zap", "Target", "Users", "Brain"],
    ),
    ("components/TestimonialsSection.tsx", &["Briefcase", "Building"]),
    ("components/TruthfulTrustSection.tsx", &["Clock", "Star", "Users"]),
    ("components/VideoTestimonials.tsx", &["TrendingUp", "Calendar"]),
];

const CONST_NAMES: &[&str] = &["totalButtons", "fid", "shifts", "testData"];

const TARGETED: &[(&str, usize, &str, &str)] = &[
    (
        "app/family-athlete-demo/page.tsx",
        76,
        "mother's journey",
        "mother&apos;s journey",
    ),
    ("app/mobile-demo/page.tsx", 61, "mum's first", "mum&apos;s first"),
    (
        "app/mobile-demo/page.tsx",
        172,
        "You're Not Alone",
        "You&apos;re Not Alone",
    ),
    (
        "app/performance-accelerator/page.tsx",
        253,
        "\"bulletproof\"",
        "&ldquo;bulletproof&rdquo;",
    ),
    ("components/Footer.tsx", 379, "Let's Stay", "Let&apos;s Stay"),
    (
        "components/SectionErrorBoundary.tsx",
        50,
        "couldn't load",
        "couldn&apos;t load",
    ),
    (
        "components/TruthfulTrustSection.tsx",
        208,
        "\"trust you\"",
        "&ldquo;trust you&rdquo;",
    ),
    (
        "components/spacing/SpacingShowcase.tsx",
        25,
        "I'm the",
        "I&apos;m the",
    ),
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The configuration compiled into the binary.
pub fn builtin() -> PatcherConfig {
    let unused_symbols: BTreeMap<String, Vec<String>> = UNUSED_SYMBOLS
        .iter()
        .map(|(key, symbols)| (key.to_string(), owned(symbols)))
        .collect();

    let targeted = TARGETED
        .iter()
        .map(|(file, line, find, replace)| TargetedFix {
            file: file.to_string(),
            line: *line,
            find: find.to_string(),
            replace: replace.to_string(),
        })
        .collect();

    PatcherConfig {
        root: None,
        files: owned(FILES),
        typescript_suffixes: default_typescript_suffixes(),
        scan_extensions: default_scan_extensions(),
        const_names: owned(CONST_NAMES),
        disabled_rules: Vec::new(),
        unused_symbols,
        targeted,
    }
}
