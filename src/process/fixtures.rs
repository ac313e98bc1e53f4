//! Report text used across the parser tests.

pub const REPORT_452: &str = r#"LM_XB452
Des Moines, IA    Mon Mar 01, 2021    USDA Market News

National Weekly Boxed Beef Cutout And Boxed Beef Cuts - Negotiated Sales

------------------------------------------------------------------------------
Upper 2/3 Choice Items Cuts
IMPS  FL  Item Description          Trades     Pounds     Price Range    Wtd Avg
------------------------------------------------------------------------------
109E  1  Rib, ribeye, lip-on, bn-in    82     160,165   652.00   825.00   685.65
112A  3  Rib, ribeye, bnls, light      58     203,432   744.00   865.35   784.31
114E  3  Chuck, clod, arm roast

      3  Round, top inside, side off    0           0
------------------------------------------------------------------------------
Lower 1/3 Choice Items
IMPS  FL  Item Description          Trades     Pounds     Price Range    Wtd Avg
------------------------------------------------------------------------------
116A  3  Chuck, roll, lxl, neck/off   118     808,816   249.00   314.54   269.99
116B  1  Chuck, chuck tender (IM)      41     193,739   209.09   228.57   218.71
189A  4  Loin, tndrloin, trmd, heavy   89     487,858   910.48  1125.00   933.62
------------------------------------------------------------------------------
Branded Select Items
IMPS  FL  Item Description          Trades     Pounds     Price Range    Wtd Avg
------------------------------------------------------------------------------
193   4  Flank, flank steak (IM)       50      99,311   529.00   590.75   551.82
121D  4  Plate, Inside Skirt (IM)      43     169,917   423.00   470.50   437.62
         Ground Chuck 80%              24     112,807   180.00   215.00   188.06
------------------------------------------------------------------------------
Legal Notice
------------------------------------------------------------------------------
Prices are reported FOB plant. Trades 5 or fewer are confidential.
------------------------------------------------------------------------------
"#;

/// Same report, but the Lower 1/3 block has a stray sixth column.
pub const REPORT_452_MALFORMED: &str = r#"LM_XB452
------------------------------------------------------------------------------
Upper 2/3 Choice Items Cuts
------------------------------------------------------------------------------
109E  1  Rib, ribeye, lip-on, bn-in    82     160,165   652.00   825.00   685.65
112A  3  Rib, ribeye, bnls, light      58     203,432   744.00   865.35   784.31
------------------------------------------------------------------------------
Lower 1/3 Choice Items
------------------------------------------------------------------------------
116A  3  Chuck, roll, lxl, neck/off   118     808,816   249.00   314.54   269.99   12.50
116B  1  Chuck, chuck tender (IM)      41     193,739   209.09   228.57   218.71    9.75
------------------------------------------------------------------------------
"#;

pub const REPORT_402: &str = r#"LM_XB402
National Daily Boxed Beef Cutout And Boxed Beef Cuts - Negotiated Sales - PM
------------------------------------------------------------------------------
Choice Cuts
IMPS FL Item Description               Trades     Pounds    Price Range   Wtd Avg
------------------------------------------------------------------------------
112A 3  Rib, ribeye, bnls, light          3       1,402   530.34  550.25  544.50
113C 1  Chuck, semi-bnls, neck/off        0           0
114D 3  Chuck, clod, top blade            0           0
116B 1  Chuck, chuck tender (IM)
     3  Chuck roll, retail ready          0           0
185C 1  Loin, sirloin, tri-tip (IM)       5      86,531   203.77  208.00  205.46
        Flank, flank steak (IM)
------------------------------------------------------------------------------
"#;
